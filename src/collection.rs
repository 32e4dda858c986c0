//! Item Collection: photo intake, analysis and the working set.

use base64::Engine;
use tracing::{debug, error, info, warn};

use crate::error::WorkflowError;
use crate::models::{ClothingItem, ImagePayload};
use crate::session::Session;
use crate::workflow::{Event, Phase, Stage};

pub struct ItemCollection<'a> {
    session: &'a Session,
}

impl<'a> ItemCollection<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Replaces the working set with the remote store's copy. On failure the
    /// current working set is kept and the error is only logged; the returned
    /// `Err` lets callers tell a failed load from an empty wardrobe.
    pub async fn load_items(&self) -> Result<usize, WorkflowError> {
        match self.session.service().list_items(self.session.id()).await {
            Ok(items) => {
                let count = items.len();
                self.session.state().items = items;
                info!("📥 Working set loaded for session {}: {} items", self.session.id(), count);
                Ok(count)
            }
            Err(e) => {
                warn!("⚠️ Could not load items for session {}: {}", self.session.id(), e);
                Err(WorkflowError::remote("loading items", e))
            }
        }
    }

    /// Sends one photo for analysis and appends the result to the working set.
    ///
    /// Any non-empty payload is forwarded as is; the analysis service decides
    /// what it can read. Refused with [`WorkflowError::Busy`] while another
    /// analysis is in flight. Nothing is queued and nothing is retried.
    pub async fn submit_photo(&self, image: ImagePayload) -> Result<ClothingItem, WorkflowError> {
        if image.is_empty() {
            return Err(WorkflowError::validation("The photo is empty"));
        }

        {
            let mut state = self.session.state();
            state.advance_analysis(Event::AnalysisStarted)?;
            state.last_error = None;
        }

        // Only for the log line: HEIC and friends are unknown here but fine remotely.
        match image::guess_format(image.as_bytes()) {
            Ok(format) => info!("📸 Analyzing {:?} photo ({} bytes)", format, image.len()),
            Err(_) => info!("📸 Analyzing photo of unrecognized format ({} bytes)", image.len()),
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(image.as_bytes());
        let result = self.session.service().analyze_item(self.session.id(), encoded).await;

        let mut state = self.session.state();
        state.analysis = state.analysis.next(Event::AnalysisSettled).unwrap_or(Phase::Idle);
        match result {
            Ok(item) => {
                info!(
                    "✅ Added {} {} to the wardrobe ({} items)",
                    item.color,
                    item.category,
                    state.items.len() + 1
                );
                state.items.push(item.clone());
                Ok(item)
            }
            Err(e) => {
                error!("❌ Photo analysis failed: {}", e);
                state.last_error = Some(format!("Failed to analyze clothing item: {e}"));
                Err(WorkflowError::remote("photo analysis", e))
            }
        }
    }

    /// Removes the item locally, then deletes it remotely on a best-effort
    /// basis. A remote failure leaves the local removal in place. Returns
    /// whether the id was present.
    pub async fn delete_item(&self, item_id: &str) -> bool {
        let removed = {
            let mut state = self.session.state();
            let before = state.items.len();
            state.items.retain(|i| i.id != item_id);
            state.items.len() != before
        };
        if !removed {
            debug!("Delete of unknown item {} ignored", item_id);
            return false;
        }

        if let Err(e) = self.session.service().delete_item(item_id, self.session.id()).await {
            warn!("⚠️ Remote delete of {} failed, local removal kept: {}", item_id, e);
        }
        true
    }

    /// "Choose style": moves on to Style Selection.
    pub fn choose_style(&self) -> Result<(), WorkflowError> {
        let mut state = self.session.state();
        if state.items.is_empty() {
            return Err(WorkflowError::validation(
                "Add at least one clothing item before choosing a style",
            ));
        }
        state.navigate(Stage::StyleSelection);
        Ok(())
    }
}
