//! Qualifier overlays: alternate, cached views of a descriptor.
//!
//! A qualifier is a type-like tag. Every descriptor kind resolves one
//! `Detail` per registered qualifier and wraps its unqualified model in an
//! `Overlay` that answers presentation queries itself and forwards
//! everything else to the model it wraps.
//!
//! Resolution per field: qualifier patch, then the member's unqualified
//! patch, then the inherited base detail.

#[cfg(test)]
mod tests;

use crate::{
    detail::{Detail, DetailPatch},
    marker::Presentation,
    model::RelationModel,
};
use derive_more::Deref;
use std::{
    any::{Any, TypeId},
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

///
/// Qualifier
///

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Qualifier {
    id: TypeId,
    name: &'static str,
}

impl Qualifier {
    #[must_use]
    pub fn of<Q: Any>() -> Self {
        Self {
            id: TypeId::of::<Q>(),
            name: std::any::type_name::<Q>(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl fmt::Debug for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qualifier({})", self.short_name())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Ord for Qualifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Qualifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///
/// QualifiedDetails
///
/// Builder-side collection of declared presentation patches.
///

#[derive(Clone, Debug, Default)]
pub struct QualifiedDetails {
    default: DetailPatch,
    patches: BTreeMap<Qualifier, DetailPatch>,
    qualifiers: BTreeSet<Qualifier>,
}

impl QualifiedDetails {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one `Presentation` declaration in.
    pub fn declare(&mut self, presentation: &Presentation) {
        match presentation.qualifier {
            Some(qualifier) => {
                self.qualifiers.insert(qualifier);
                self.patches
                    .entry(qualifier)
                    .or_default()
                    .merge(&presentation.detail);
            }
            None => self.default.merge(&presentation.detail),
        }
    }

    /// Register a qualifier without declaring details for it.
    pub fn register(&mut self, qualifier: Qualifier) {
        self.qualifiers.insert(qualifier);
    }

    pub fn register_all(&mut self, qualifiers: impl IntoIterator<Item = Qualifier>) {
        self.qualifiers.extend(qualifiers);
    }

    #[must_use]
    pub const fn qualifiers(&self) -> &BTreeSet<Qualifier> {
        &self.qualifiers
    }

    #[must_use]
    pub fn patch(&self, qualifier: &Qualifier) -> Option<&DetailPatch> {
        self.patches.get(qualifier)
    }

    #[must_use]
    pub fn default_detail(&self, base: &Detail) -> Detail {
        base.patched(&self.default)
    }

    /// Detail for `qualifier`; without an explicit patch this is the default.
    #[must_use]
    pub fn detail_for(&self, qualifier: &Qualifier, base: &Detail) -> Detail {
        let detail = self.default_detail(base);

        match self.patches.get(qualifier) {
            Some(patch) => detail.patched(patch),
            None => detail,
        }
    }
}

///
/// InheritedDetails
///
/// What a member inherits from its owner: the owner's declared details
/// resolved over the configured defaults. Only visibility and the inline
/// flag are inherited; labels and the rest stay with the owner.
///

#[derive(Clone, Debug, Default)]
pub struct InheritedDetails {
    owner: QualifiedDetails,
    base: Detail,
}

impl InheritedDetails {
    #[must_use]
    pub const fn new(owner: QualifiedDetails, base: Detail) -> Self {
        Self { owner, base }
    }

    /// Base detail for a member under `qualifier` (`None` for unqualified).
    #[must_use]
    pub fn base_for(&self, qualifier: Option<&Qualifier>) -> Detail {
        let owner = match qualifier {
            Some(qualifier) => self.owner.detail_for(qualifier, &self.base),
            None => self.owner.default_detail(&self.base),
        };

        Detail::new(owner.visible, owner.inline)
    }

    #[must_use]
    pub const fn owner(&self) -> &QualifiedDetails {
        &self.owner
    }
}

///
/// Overlay
///
/// A descriptor seen through one qualifier. Presentation is answered from
/// the overlay's own detail; anything else derefs to the wrapped model.
///

#[derive(Deref)]
pub struct Overlay<M> {
    qualifier: Option<Qualifier>,
    detail: Detail,
    relation: Option<RelationModel>,
    #[deref(forward)]
    delegate: Arc<M>,
}

impl<M> Overlay<M> {
    #[must_use]
    pub const fn new(qualifier: Option<Qualifier>, detail: Detail, delegate: Arc<M>) -> Self {
        Self {
            qualifier,
            detail,
            relation: None,
            delegate,
        }
    }

    /// Attach a relation owned by this overlay; it shadows the delegate's.
    #[must_use]
    pub fn with_relation(mut self, relation: Option<RelationModel>) -> Self {
        self.relation = relation;
        self
    }

    /// `None` for the unqualified view.
    #[must_use]
    pub const fn qualifier(&self) -> Option<Qualifier> {
        self.qualifier
    }

    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    #[must_use]
    pub const fn delegate(&self) -> &Arc<M> {
        &self.delegate
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.detail.visible
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.detail.label.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.detail.description.as_deref()
    }

    #[must_use]
    pub const fn order(&self) -> Option<i32> {
        self.detail.order
    }

    #[must_use]
    pub fn render_hints(&self) -> &[String] {
        &self.detail.render_hints
    }

    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.detail.format.as_deref()
    }

    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.detail.inline
    }

    pub(crate) const fn own_relation(&self) -> Option<&RelationModel> {
        self.relation.as_ref()
    }
}

impl<M: fmt::Debug> fmt::Debug for Overlay<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("qualifier", &self.qualifier)
            .field("detail", &self.detail)
            .field("relation", &self.relation)
            .field("delegate", &self.delegate)
            .finish()
    }
}

///
/// OverlayCache
///
/// Memoized overlays keyed by qualifier. Filled once when the owning
/// descriptor is built; read-only afterwards.
///

#[derive(Debug)]
pub struct OverlayCache<R> {
    entries: BTreeMap<Qualifier, Arc<R>>,
}

impl<R> OverlayCache<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, qualifier: Qualifier, overlay: R) -> &Arc<R> {
        self.entries.entry(qualifier).or_insert_with(|| Arc::new(overlay))
    }

    #[must_use]
    pub fn get(&self, qualifier: &Qualifier) -> Option<&Arc<R>> {
        self.entries.get(qualifier)
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Qualifier> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for OverlayCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
