//! Workflow state shared by the three stage controllers.
//!
//! Busy tracking is an explicit phase machine ([`Phase`] + [`Event`]) run on
//! two lanes, one for photo analysis and one for outfit generation. Each lane
//! only ever moves through [`Phase::next`], so an action that would start a
//! second request on a busy lane is refused instead of queued.

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::catalog::StyleId;
use crate::error::WorkflowError;
use crate::models::{ClothingItem, GeneratedOutfit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ItemCollection,
    StyleSelection,
    OutfitComposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Analyzing,
    Ready,
    Generating,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    AnalysisStarted,
    AnalysisSettled,
    /// Items and style are both known and no outfit exists yet.
    PreconditionsMet,
    GenerationStarted,
    GenerationSucceeded,
    GenerationFailed,
    Reset,
}

impl Phase {
    /// The transition table. `None` means the event is not allowed here.
    pub fn next(self, event: Event) -> Option<Phase> {
        use Event::*;
        use Phase::*;
        match (self, event) {
            (Idle, AnalysisStarted) => Some(Analyzing),
            (Analyzing, AnalysisSettled) => Some(Idle),

            (Idle, PreconditionsMet) => Some(Ready),
            (Idle | Ready | Done | Error, GenerationStarted) => Some(Generating),
            (Generating, GenerationSucceeded) => Some(Done),
            (Generating, GenerationFailed) => Some(Error),
            (Idle | Ready | Generating | Done | Error, Reset) => Some(Idle),

            _ => None,
        }
    }
}

/// Everything Outfit Composition owns. Replaced wholesale when discarded; the
/// epoch lets an in-flight generation notice it no longer has a target.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    pub epoch: u64,
    pub items: Vec<ClothingItem>,
    pub outfit: Option<GeneratedOutfit>,
}

#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub stage: Stage,
    /// Item Collection's working set, in arrival order.
    pub items: Vec<ClothingItem>,
    pub style: Option<StyleId>,
    pub composition: Composition,
    pub analysis: Phase,
    pub generation: Phase,
    pub last_error: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            stage: Stage::ItemCollection,
            items: Vec::new(),
            style: None,
            composition: Composition::default(),
            analysis: Phase::Idle,
            generation: Phase::Idle,
            last_error: None,
        }
    }
}

impl WorkflowState {
    pub fn is_analyzing(&self) -> bool {
        self.analysis == Phase::Analyzing
    }

    pub fn is_generating(&self) -> bool {
        self.generation == Phase::Generating
    }

    pub fn advance_analysis(&mut self, event: Event) -> Result<(), WorkflowError> {
        self.analysis = self
            .analysis
            .next(event)
            .ok_or(WorkflowError::Busy("photo analysis"))?;
        Ok(())
    }

    pub fn advance_generation(&mut self, event: Event) -> Result<(), WorkflowError> {
        self.generation = self
            .generation
            .next(event)
            .ok_or(WorkflowError::Busy("outfit generation"))?;
        Ok(())
    }

    /// Drops the current outfit and composition items. Any generation still in
    /// flight for the old composition will find a different epoch and be ignored.
    pub fn discard_composition(&mut self) {
        self.composition = Composition {
            epoch: self.composition.epoch + 1,
            ..Composition::default()
        };
        self.generation = self.generation.next(Event::Reset).unwrap_or(Phase::Idle);
    }

    pub fn navigate(&mut self, stage: Stage) {
        self.stage = stage;
        self.last_error = None;
    }

    /// The single status label for the presentation layer.
    pub fn status(&self) -> Phase {
        if self.is_analyzing() {
            Phase::Analyzing
        } else {
            self.generation
        }
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView {
            stage: self.stage,
            status: self.status(),
            is_analyzing: self.is_analyzing(),
            is_generating: self.is_generating(),
            items: self.items.clone(),
            outfit_items: self.composition.items.clone(),
            style: self.style,
            outfit: self.composition.outfit.clone(),
            error: self.last_error.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowView {
    pub stage: Stage,
    pub status: Phase,
    pub is_analyzing: bool,
    pub is_generating: bool,
    pub items: Vec<ClothingItem>,
    pub outfit_items: Vec<ClothingItem>,
    pub style: Option<StyleId>,
    pub outfit: Option<GeneratedOutfit>,
    pub error: Option<String>,
}
