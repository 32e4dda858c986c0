use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::collection::ItemCollection;
use crate::composition::OutfitComposition;
use crate::models::SessionId;
use crate::service::OutfitService;
use crate::style::StyleSelection;
use crate::workflow::{WorkflowState, WorkflowView};

/// One user's workflow: the session identity, its state and the remote
/// service handle. Cheap to clone; clones share the same state.
///
/// The state lock is never held across an `.await`.
#[derive(Clone)]
pub struct Session {
    id: SessionId,
    state: Arc<Mutex<WorkflowState>>,
    service: Arc<dyn OutfitService>,
}

impl Session {
    pub fn new(service: Arc<dyn OutfitService>) -> Self {
        Self::with_id(SessionId::generate(), service)
    }

    pub fn with_id(id: SessionId, service: Arc<dyn OutfitService>) -> Self {
        Self { id, state: Arc::default(), service }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn view(&self) -> WorkflowView {
        self.state.lock().view()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock()
    }

    pub(crate) fn service(&self) -> &dyn OutfitService {
        self.service.as_ref()
    }

    pub fn collection(&self) -> ItemCollection<'_> {
        ItemCollection::new(self)
    }

    pub fn styles(&self) -> StyleSelection<'_> {
        StyleSelection::new(self)
    }

    pub fn composition(&self) -> OutfitComposition<'_> {
        OutfitComposition::new(self)
    }
}
