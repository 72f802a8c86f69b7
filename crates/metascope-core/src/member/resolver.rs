use crate::{
    marker::{Alias, Embedded, Ignore, Named},
    member::Member,
};
use std::fmt;

///
/// AttributeResolver
///
/// Decides whether a member is processed, aliased, recursed into or
/// renamed.
///

pub trait AttributeResolver: fmt::Debug + Send + Sync {
    fn is_ignore(&self, member: &dyn Member) -> bool;

    fn aliases(&self, member: &dyn Member) -> Vec<String>;

    fn is_alias(&self, member: &dyn Member) -> bool {
        !self.aliases(member).is_empty()
    }

    fn is_embedded(&self, member: &dyn Member) -> bool;

    fn name(&self, member: &dyn Member) -> String;
}

///
/// MarkerAttributeResolver
///
/// Answers from the built-in markers: `Ignore`, `Alias`, `Embedded`, `Named`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerAttributeResolver;

impl AttributeResolver for MarkerAttributeResolver {
    fn is_ignore(&self, member: &dyn Member) -> bool {
        member.markers().has::<Ignore>()
    }

    fn aliases(&self, member: &dyn Member) -> Vec<String> {
        member
            .markers()
            .all::<Alias>()
            .map(|alias| alias.0.clone())
            .collect()
    }

    fn is_embedded(&self, member: &dyn Member) -> bool {
        member.markers().has::<Embedded>()
    }

    fn name(&self, member: &dyn Member) -> String {
        member
            .markers()
            .first::<Named>()
            .map_or_else(|| member.name().to_string(), |named| named.0.clone())
    }
}
