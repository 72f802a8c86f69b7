//! Presentation details carried by descriptors and their qualifier overlays.

use serde::{Deserialize, Serialize};

///
/// Detail
///
/// Fully resolved presentation details of one descriptor under one qualifier.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Detail {
    pub visible: bool,
    pub label: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub render_hints: Vec<String>,
    pub format: Option<String>,
    pub inline: bool,
}

impl Detail {
    #[must_use]
    pub const fn new(visible: bool, inline: bool) -> Self {
        Self {
            visible,
            label: None,
            description: None,
            order: None,
            render_hints: Vec::new(),
            format: None,
            inline,
        }
    }

    /// Overlay every field the patch sets; unset fields are kept.
    #[must_use]
    pub fn patched(&self, patch: &DetailPatch) -> Self {
        Self {
            visible: patch.visible.unwrap_or(self.visible),
            label: patch.label.clone().or_else(|| self.label.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            order: patch.order.or(self.order),
            render_hints: patch
                .render_hints
                .clone()
                .unwrap_or_else(|| self.render_hints.clone()),
            format: patch.format.clone().or_else(|| self.format.clone()),
            inline: patch.inline.unwrap_or(self.inline),
        }
    }
}

impl Default for Detail {
    fn default() -> Self {
        Self::new(true, false)
    }
}

///
/// DetailPatch
///
/// Partial details as declared by one or more `Presentation` markers.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DetailPatch {
    pub visible: Option<bool>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub render_hints: Option<Vec<String>>,
    pub format: Option<String>,
    pub inline: Option<bool>,
}

impl DetailPatch {
    /// Fold a later declaration into this one; the later one wins per field.
    pub fn merge(&mut self, later: &Self) {
        if later.visible.is_some() {
            self.visible = later.visible;
        }
        if later.label.is_some() {
            self.label.clone_from(&later.label);
        }
        if later.description.is_some() {
            self.description.clone_from(&later.description);
        }
        if later.order.is_some() {
            self.order = later.order;
        }
        if later.render_hints.is_some() {
            self.render_hints.clone_from(&later.render_hints);
        }
        if later.format.is_some() {
            self.format.clone_from(&later.format);
        }
        if later.inline.is_some() {
            self.inline = later.inline;
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.visible.is_none()
            && self.label.is_none()
            && self.description.is_none()
            && self.order.is_none()
            && self.render_hints.is_none()
            && self.format.is_none()
            && self.inline.is_none()
    }
}
