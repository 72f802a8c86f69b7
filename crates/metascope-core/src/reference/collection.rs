use crate::{
    reference::{AccessError, target_mut, target_ref},
    types::{TypeToken, Typed},
    value::{FieldValue, Value},
};
use std::{
    any::Any,
    collections::{BTreeSet, HashSet, VecDeque},
    fmt,
    hash::Hash,
    marker::PhantomData,
};

///
/// CollectionOps
///
/// Collection-shaped operations on a type-erased collection value.
///

pub trait CollectionOps: fmt::Debug + Send + Sync {
    fn element_type(&self) -> TypeToken;

    fn add(&self, collection: &mut dyn Any, element: &Value) -> Result<bool, AccessError>;

    fn remove(&self, collection: &mut dyn Any, element: &Value) -> Result<bool, AccessError>;

    fn contains(&self, collection: &dyn Any, element: &Value) -> Result<bool, AccessError>;

    fn values(&self, collection: &dyn Any) -> Result<Vec<Value>, AccessError>;

    fn size(&self, collection: &dyn Any) -> Result<usize, AccessError>;

    fn clear(&self, collection: &mut dyn Any) -> Result<(), AccessError>;
}

///
/// CollectionValue
///
/// Typed collection fields that can back a collection capability.
///

pub trait CollectionValue: FieldValue + Typed {
    type Element: FieldValue + Typed;

    fn insert_element(&mut self, element: Self::Element) -> bool;

    fn remove_element(&mut self, element: &Self::Element) -> bool;

    fn contains_element(&self, element: &Self::Element) -> bool;

    fn element_values(&self) -> Vec<Value>;

    fn element_count(&self) -> usize;

    fn clear_elements(&mut self);
}

impl<E> CollectionValue for Vec<E>
where
    E: FieldValue + Typed + PartialEq,
{
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.push(element);
        true
    }

    fn remove_element(&mut self, element: &E) -> bool {
        match self.iter().position(|e| e == element) {
            Some(index) => {
                self.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn element_values(&self) -> Vec<Value> {
        self.iter().map(FieldValue::to_value).collect()
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

impl<E> CollectionValue for VecDeque<E>
where
    E: FieldValue + Typed + PartialEq,
{
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.push_back(element);
        true
    }

    fn remove_element(&mut self, element: &E) -> bool {
        match self.iter().position(|e| e == element) {
            Some(index) => self.remove(index).is_some(),
            None => false,
        }
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn element_values(&self) -> Vec<Value> {
        self.iter().map(FieldValue::to_value).collect()
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

impl<E> CollectionValue for BTreeSet<E>
where
    E: FieldValue + Typed + Ord,
{
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.insert(element)
    }

    fn remove_element(&mut self, element: &E) -> bool {
        self.remove(element)
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn element_values(&self) -> Vec<Value> {
        self.iter().map(FieldValue::to_value).collect()
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

impl<E> CollectionValue for HashSet<E>
where
    E: FieldValue + Typed + Eq + Hash,
{
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.insert(element)
    }

    fn remove_element(&mut self, element: &E) -> bool {
        self.remove(element)
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn element_values(&self) -> Vec<Value> {
        self.iter().map(FieldValue::to_value).collect()
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

///
/// CollectionAccess
///
/// `CollectionOps` for one concrete collection type.
///

pub struct CollectionAccess<C> {
    _marker: PhantomData<fn() -> C>,
}

impl<C: CollectionValue> CollectionAccess<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn element(value: &Value) -> Result<C::Element, AccessError> {
        C::Element::from_value(value).ok_or_else(|| AccessError::TypeMismatch {
            name: "element".to_string(),
            expected: std::any::type_name::<C::Element>(),
            found: value.kind(),
        })
    }
}

impl<C: CollectionValue> Default for CollectionAccess<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CollectionAccess<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionAccess")
            .field("collection", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C: CollectionValue> CollectionOps for CollectionAccess<C> {
    fn element_type(&self) -> TypeToken {
        C::Element::type_token()
    }

    fn add(&self, collection: &mut dyn Any, element: &Value) -> Result<bool, AccessError> {
        let element = Self::element(element)?;

        Ok(target_mut::<C>(collection)?.insert_element(element))
    }

    fn remove(&self, collection: &mut dyn Any, element: &Value) -> Result<bool, AccessError> {
        let element = Self::element(element)?;

        Ok(target_mut::<C>(collection)?.remove_element(&element))
    }

    fn contains(&self, collection: &dyn Any, element: &Value) -> Result<bool, AccessError> {
        let element = Self::element(element)?;

        Ok(target_ref::<C>(collection)?.contains_element(&element))
    }

    fn values(&self, collection: &dyn Any) -> Result<Vec<Value>, AccessError> {
        Ok(target_ref::<C>(collection)?.element_values())
    }

    fn size(&self, collection: &dyn Any) -> Result<usize, AccessError> {
        Ok(target_ref::<C>(collection)?.element_count())
    }

    fn clear(&self, collection: &mut dyn Any) -> Result<(), AccessError> {
        target_mut::<C>(collection)?.clear_elements();

        Ok(())
    }
}
