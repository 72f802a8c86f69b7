//! Path/reference builder: the stack machine behind embedding.
//!
//! While a type tree is walked depth first, each embedded property pushes a
//! frame. The current frames compose into one value reference reaching
//! from the root to the innermost property, and into one flattened name.
//! A builder is per build pass and never shared.

use crate::{
    create::ObjectFactoryRef,
    member::{Member, PropertyMember},
    reference::{DeferredReference, ValueReference},
    types::TypeToken,
};
use std::sync::Arc;

#[derive(Debug)]
struct PathFrame {
    name: String,
    reference: Arc<dyn ValueReference>,
    member: PropertyMember,
}

///
/// PathBuilder
///

#[derive(Debug)]
pub struct PathBuilder {
    indicator: char,
    factory: Option<ObjectFactoryRef>,
    frames: Vec<PathFrame>,
}

impl PathBuilder {
    #[must_use]
    pub const fn new(indicator: char, factory: Option<ObjectFactoryRef>) -> Self {
        Self {
            indicator,
            factory,
            frames: Vec::new(),
        }
    }

    #[must_use]
    pub const fn indicator(&self) -> char {
        self.indicator
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Push a frame for `member` under its resolved local name.
    pub fn push_property(&mut self, member: &PropertyMember, local: impl Into<String>) {
        self.frames.push(PathFrame {
            name: local.into(),
            reference: Arc::clone(member.reference()),
            member: member.clone(),
        });
    }

    /// Pop the innermost frame; returns its member.
    pub fn pop_property(&mut self) -> Option<PropertyMember> {
        self.frames.pop().map(|frame| frame.member)
    }

    /// Member of the innermost frame.
    #[must_use]
    pub fn current_member(&self) -> Option<&PropertyMember> {
        self.frames.last().map(|frame| &frame.member)
    }

    /// True if some frame on the stack holds a value of type `ty`.
    #[must_use]
    pub fn is_walking(&self, ty: &TypeToken) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.member.value_type().object_type() == *ty)
    }

    /// Compose the frames into a single reference from the root. A lone
    /// frame is returned as is.
    #[must_use]
    pub fn current_reference(&self) -> Option<Arc<dyn ValueReference>> {
        let (innermost, outer) = self.frames.split_last()?;
        let mut reference = Arc::clone(&innermost.reference);

        for (depth, frame) in outer.iter().enumerate().rev() {
            let name = self.join(&self.frames[depth..]);

            reference = Arc::new(DeferredReference::new(
                name,
                Arc::clone(&frame.reference),
                reference,
                self.factory.clone(),
            ));
        }

        Some(reference)
    }

    /// Local frame names, outermost first.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        self.frames.iter().map(|frame| frame.name.clone()).collect()
    }

    /// Frame names joined outermost first; empty when there are no frames.
    #[must_use]
    pub fn resolve_name(&self) -> String {
        self.join(&self.frames)
    }

    /// Name for an operation declared at the current depth. The prefix and
    /// separator only appear inside an embedding.
    #[must_use]
    pub fn resolve_operation_name(&self, local: &str) -> String {
        if self.frames.is_empty() {
            local.to_string()
        } else {
            format!("{}{}{local}", self.resolve_name(), self.indicator)
        }
    }

    fn join(&self, frames: &[PathFrame]) -> String {
        let mut name = String::new();

        for (index, frame) in frames.iter().enumerate() {
            if index > 0 {
                name.push(self.indicator);
            }
            name.push_str(&frame.name);
        }

        name
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reference::FieldReference,
        types::{TypeToken, Typed},
        value::Value,
    };
    use proptest::prelude::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level0 {
        next: Level1,
        value: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level1 {
        next: Level2,
        value: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level2 {
        next: Level3,
        value: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level3 {
        value: i64,
    }

    crate::object_type!(Level0, Level1, Level2, Level3);

    fn member<T, F>(
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> PropertyMember
    where
        T: Typed,
        F: crate::value::FieldValue + Typed,
    {
        PropertyMember::new(
            name,
            TypeToken::of::<T>(),
            Arc::new(FieldReference::new(name, get, get_mut)),
        )
    }

    // Members walking root -> next -> next ... and the leaf value at each depth.
    fn chain() -> (Vec<PropertyMember>, Vec<PropertyMember>) {
        let hops = vec![
            member::<Level0, Level1>("next", |l| &l.next, |l| &mut l.next),
            member::<Level1, Level2>("next", |l| &l.next, |l| &mut l.next),
            member::<Level2, Level3>("next", |l| &l.next, |l| &mut l.next),
        ];
        let leaves = vec![
            member::<Level0, i64>("value", |l| &l.value, |l| &mut l.value),
            member::<Level1, i64>("value", |l| &l.value, |l| &mut l.value),
            member::<Level2, i64>("value", |l| &l.value, |l| &mut l.value),
            member::<Level3, i64>("value", |l| &l.value, |l| &mut l.value),
        ];

        (hops, leaves)
    }

    fn root(values: [i64; 4]) -> Level0 {
        Level0 {
            value: values[0],
            next: Level1 {
                value: values[1],
                next: Level2 {
                    value: values[2],
                    next: Level3 { value: values[3] },
                },
            },
        }
    }

    #[test]
    fn empty_stack_has_no_reference_and_empty_name() {
        let path = PathBuilder::new('.', None);

        assert!(path.current_reference().is_none());
        assert_eq!(path.resolve_name(), "");
        assert_eq!(path.resolve_operation_name("run"), "run");
    }

    #[test]
    fn single_frame_is_not_wrapped() {
        let (_, leaves) = chain();
        let mut path = PathBuilder::new('.', None);
        path.push_property(&leaves[0], "value");

        let reference = path.current_reference().unwrap();
        assert!(Arc::ptr_eq(&reference, leaves[0].reference()));
        assert_eq!(path.resolve_name(), "value");
    }

    #[test]
    fn operation_names_get_prefix_only_inside_embedding() {
        let (hops, _) = chain();
        let mut path = PathBuilder::new('.', None);
        path.push_property(&hops[0], "outer");

        assert_eq!(path.resolve_operation_name("run"), "outer.run");

        path.pop_property();
        assert_eq!(path.resolve_operation_name("run"), "run");
    }

    #[test]
    fn pop_restores_previous_frame() {
        let (hops, leaves) = chain();
        let mut path = PathBuilder::new('/', None);
        path.push_property(&hops[0], "a");
        path.push_property(&leaves[1], "b");

        assert_eq!(path.resolve_name(), "a/b");
        assert_eq!(path.pop_property().map(|m| m.name().to_string()), Some("value".into()));
        assert_eq!(path.resolve_name(), "a");
        assert_eq!(path.depth(), 1);
        assert!(path.is_walking(&TypeToken::of::<Level1>()));
        assert!(!path.is_walking(&TypeToken::of::<Level2>()));
    }

    #[test]
    fn composed_reference_writes_nested_field() {
        let (hops, leaves) = chain();
        let mut path = PathBuilder::new('.', None);
        path.push_property(&hops[0], "outer");
        path.push_property(&leaves[1], "inner");

        let reference = path.current_reference().unwrap();
        let mut value = Level0::default();
        reference.set_value(&mut value, Value::Int(7)).unwrap();

        assert_eq!(value.next.value, 7);
        assert_eq!(reference.get_value(&value).unwrap(), Value::Int(7));
        assert_eq!(reference.name(), "outer.inner");
    }

    proptest! {
        #[test]
        fn names_and_reads_follow_the_chain(
            depth in 1usize..=4,
            names in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 4),
            values in any::<[i64; 4]>(),
        ) {
            let (hops, leaves) = chain();
            let mut path = PathBuilder::new('.', None);

            for (hop, name) in hops.iter().zip(&names).take(depth - 1) {
                path.push_property(hop, name.clone());
            }
            path.push_property(&leaves[depth - 1], names[depth - 1].clone());

            prop_assert_eq!(path.resolve_name(), names[..depth].join("."));

            // manual chain: walk the hops one get at a time, then read the leaf
            let root = root(values);
            let mut current: &dyn std::any::Any = &root;
            for hop in hops.iter().take(depth - 1) {
                current = hop.reference().resolve(current).unwrap().unwrap();
            }
            let manual = leaves[depth - 1].reference().get_value(current).unwrap();

            let composed = path.current_reference().unwrap().get_value(&root).unwrap();
            prop_assert_eq!(composed, manual);
            prop_assert_eq!(path.current_reference().unwrap().get_value(&root).unwrap(), Value::Int(values[depth - 1]));
        }
    }
}
