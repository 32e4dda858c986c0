//! Outfit Composition: the generation request and its lifecycle.
//!
//! Entering the stage re-reads the wardrobe from the remote store and fires
//! generation on the Idle -> Ready edge only, so re-reading the state never
//! submits a second request. A response that arrives after its composition
//! was discarded (the style changed) is dropped.

use tracing::{debug, error, info, warn};

use crate::catalog::StyleId;
use crate::error::WorkflowError;
use crate::models::GeneratedOutfit;
use crate::session::Session;
use crate::workflow::{Event, Phase, Stage, WorkflowState};

/// A generation request that has already claimed the generation lane.
///
/// Obtained from [`OutfitComposition::begin_regenerate`] and finished with
/// [`OutfitComposition::complete`]; this split lets a caller surface busy and
/// validation errors before handing the slow remote call to a background task.
#[derive(Debug)]
#[must_use = "the generation lane stays busy until the request is completed"]
pub struct PendingGeneration {
    epoch: u64,
    style: StyleId,
    item_ids: Vec<String>,
    previous: Option<GeneratedOutfit>,
}

// Busy check, validation, lane transition and input capture all happen under
// the one lock the caller holds.
fn start_generation(
    state: &mut WorkflowState,
    take_outfit: bool,
) -> Result<PendingGeneration, WorkflowError> {
    if state.is_generating() {
        return Err(WorkflowError::Busy("outfit generation"));
    }
    if state.stage != Stage::OutfitComposition {
        return Err(WorkflowError::validation("Open the outfit view before generating"));
    }
    let style = state
        .style
        .ok_or_else(|| WorkflowError::validation("Please select a style"))?;
    if state.composition.items.is_empty() {
        return Err(WorkflowError::validation("No clothing items to build an outfit from"));
    }
    state.advance_generation(Event::GenerationStarted)?;
    state.last_error = None;
    let previous = if take_outfit { state.composition.outfit.take() } else { None };
    Ok(PendingGeneration {
        epoch: state.composition.epoch,
        style,
        item_ids: state.composition.items.iter().map(|i| i.id.clone()).collect(),
        previous,
    })
}

pub struct OutfitComposition<'a> {
    session: &'a Session,
}

impl<'a> OutfitComposition<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Deep link into the stage with a known style.
    pub fn open(&self, style_id: &str) -> Result<(), WorkflowError> {
        self.session.styles().select_style(style_id)?;
        self.session.styles().proceed().map(|_| ())
    }

    /// Runs one entry into the stage: refreshes the composition items from the
    /// remote store and, if that makes the workflow ready, generates.
    ///
    /// Returns the outfit produced by the auto-trigger, if it fired.
    pub async fn enter(&self) -> Result<Option<GeneratedOutfit>, WorkflowError> {
        let epoch = {
            let mut state = self.session.state();
            if state.style.is_none() {
                return Err(WorkflowError::validation("Please select a style"));
            }
            if !state.is_generating() {
                // A new entry starts from the outfit on hand, not from the
                // previous visit's Ready/Error.
                state.generation = if state.composition.outfit.is_some() {
                    Phase::Done
                } else {
                    Phase::Idle
                };
            }
            state.composition.epoch
        };

        match self.session.service().list_items(self.session.id()).await {
            Ok(items) => {
                let mut state = self.session.state();
                if state.composition.epoch == epoch {
                    info!(
                        "📥 Composition has {} items for session {}",
                        items.len(),
                        self.session.id()
                    );
                    state.composition.items = items;
                }
            }
            Err(e) => {
                warn!("⚠️ Could not refresh items for composition: {}", e);
                self.session.state().last_error =
                    Some(format!("Failed to load clothing items: {e}"));
            }
        }

        self.refresh().await
    }

    /// Re-evaluates readiness. Generates only when this call is the one that
    /// moves the lane from Idle to Ready.
    pub async fn refresh(&self) -> Result<Option<GeneratedOutfit>, WorkflowError> {
        let pending = {
            let mut state = self.session.state();
            let ready = state.stage == Stage::OutfitComposition
                && state.style.is_some()
                && !state.composition.items.is_empty()
                && state.composition.outfit.is_none();
            if !(ready && state.advance_generation(Event::PreconditionsMet).is_ok()) {
                return Ok(None);
            }
            start_generation(&mut state, false)?
        };
        info!("🚀 Composition ready, generating outfit");
        self.complete(pending).await.map(Some)
    }

    /// Submits the current items and style to the generation service.
    ///
    /// On failure any outfit already on hand is left in place.
    pub async fn generate(&self) -> Result<GeneratedOutfit, WorkflowError> {
        let pending = start_generation(&mut self.session.state(), false)?;
        self.complete(pending).await
    }

    /// Clears the current outfit and generates again with the same inputs.
    /// If the new request fails the previous outfit is put back.
    pub async fn regenerate(&self) -> Result<GeneratedOutfit, WorkflowError> {
        let pending = self.begin_regenerate()?;
        self.complete(pending).await
    }

    /// The synchronous half of [`regenerate`](Self::regenerate): clears the
    /// outfit and claims the generation lane, or fails right away.
    pub fn begin_regenerate(&self) -> Result<PendingGeneration, WorkflowError> {
        let pending = start_generation(&mut self.session.state(), true)?;
        info!("🔄 Regenerating outfit");
        Ok(pending)
    }

    /// Sends a claimed request to the generation service and records the
    /// outcome. Fails with [`WorkflowError::Discarded`] when the composition
    /// was thrown away while the request ran.
    pub async fn complete(
        &self,
        pending: PendingGeneration,
    ) -> Result<GeneratedOutfit, WorkflowError> {
        let PendingGeneration { epoch, style, item_ids, previous } = pending;
        info!("🎯 Generating {} outfit from {} items", style, item_ids.len());
        let result = self
            .session
            .service()
            .generate_outfit(self.session.id(), style.as_str(), item_ids)
            .await;

        let mut state = self.session.state();
        if state.composition.epoch != epoch {
            debug!("Generation finished for a discarded composition, result dropped");
            return Err(WorkflowError::Discarded);
        }
        match result {
            Ok(outfit) => {
                info!("✅ Outfit ready: {}", outfit.description);
                state.generation = state
                    .generation
                    .next(Event::GenerationSucceeded)
                    .unwrap_or(Phase::Done);
                state.composition.outfit = Some(outfit.clone());
                Ok(outfit)
            }
            Err(e) => {
                error!("❌ Outfit generation failed: {}", e);
                state.generation = state
                    .generation
                    .next(Event::GenerationFailed)
                    .unwrap_or(Phase::Error);
                state.last_error = Some(format!("Failed to generate outfit: {e}"));
                if state.composition.outfit.is_none() {
                    state.composition.outfit = previous;
                }
                Err(WorkflowError::remote("outfit generation", e))
            }
        }
    }

    /// "Change style": back to Style Selection. The outfit no longer matches
    /// whatever gets picked next, so it is discarded.
    pub fn change_style(&self) {
        let mut state = self.session.state();
        state.discard_composition();
        state.navigate(Stage::StyleSelection);
    }

    /// "Add more items": back to Item Collection, keeping everything.
    pub fn add_more_items(&self) {
        self.session.state().navigate(Stage::ItemCollection);
    }

    /// Outfits previously generated for this session.
    pub async fn history(&self) -> Result<Vec<GeneratedOutfit>, WorkflowError> {
        self.session
            .service()
            .list_outfits(self.session.id())
            .await
            .map_err(|e| WorkflowError::remote("loading outfit history", e))
    }
}
