//! Style Selection: pick exactly one entry from the fixed catalog.

use tracing::info;

use crate::catalog::{StyleCategory, StyleId, STYLE_CATALOG};
use crate::error::WorkflowError;
use crate::session::Session;
use crate::workflow::Stage;

pub struct StyleSelection<'a> {
    session: &'a Session,
}

impl<'a> StyleSelection<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn catalog(&self) -> &'static [StyleCategory] {
        &STYLE_CATALOG
    }

    /// Records the selection, replacing any previous one. Picking a different
    /// style invalidates the outfit generated for the old one.
    pub fn select_style(&self, style_id: &str) -> Result<StyleId, WorkflowError> {
        let style: StyleId = style_id
            .parse()
            .map_err(|e| WorkflowError::validation(format!("{e}")))?;
        let mut state = self.session.state();
        if state.style.is_some_and(|current| current != style) {
            info!("🎨 Style changed {:?} -> {}, discarding previous outfit", state.style, style);
            state.discard_composition();
        }
        state.style = Some(style);
        Ok(style)
    }

    /// "Generate outfit": moves on to Outfit Composition. The caller then runs
    /// [`OutfitComposition::enter`](crate::composition::OutfitComposition::enter).
    pub fn proceed(&self) -> Result<StyleId, WorkflowError> {
        let mut state = self.session.state();
        let style = state
            .style
            .ok_or_else(|| WorkflowError::validation("Please select a style"))?;
        state.navigate(Stage::OutfitComposition);
        Ok(style)
    }

    pub fn back_to_photos(&self) {
        self.session.state().navigate(Stage::ItemCollection);
    }
}
