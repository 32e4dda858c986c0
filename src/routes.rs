use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};

use crate::{
    catalog::{StyleCategory, STYLE_CATALOG},
    error::WorkflowError,
    models::{GeneratedOutfit, ImagePayload, SessionId},
    service::OutfitService,
    session::Session,
    workflow::WorkflowView,
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    pub service: Arc<dyn OutfitService>,
}

impl AppState {
    pub fn new(service: Arc<dyn OutfitService>) -> Self {
        Self { sessions: Arc::default(), service }
    }

    fn session(&self, id: String) -> Result<Session, WorkflowError> {
        self.sessions
            .read()
            .get(&SessionId::from(id.clone()))
            .cloned()
            .ok_or(WorkflowError::UnknownSession(id))
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectStyleRequest {
    pub style_id: String,
}

// Phone camera shots routinely exceed axum's 2 MB default.
const MAX_PHOTO_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/styles", get(list_styles))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/items/reload", post(reload_items))
        .route("/api/sessions/:id/photos", post(submit_photo))
        .route("/api/sessions/:id/items/:item_id", delete(delete_item))
        .route("/api/sessions/:id/choose-style", post(choose_style))
        .route("/api/sessions/:id/style", post(select_style))
        .route("/api/sessions/:id/generate-outfit", post(generate_outfit))
        .route("/api/sessions/:id/back-to-photos", post(back_to_photos))
        .route("/api/sessions/:id/outfit/:style_id", post(open_outfit))
        .route("/api/sessions/:id/regenerate", post(regenerate))
        .route("/api/sessions/:id/change-style", post(change_style))
        .route("/api/sessions/:id/add-more-items", post(add_more_items))
        .route("/api/sessions/:id/outfits", get(outfit_history))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES))
        .with_state(state)
}

type ViewResult = Result<Json<WorkflowView>, WorkflowError>;

// Runs one composition entry in the background; generation may take a minute
// and the front end polls the session view meanwhile.
fn spawn_entry(session: Session) {
    tokio::spawn(async move {
        if let Err(e) = session.composition().enter().await {
            tracing::warn!("Composition entry for {} ended with: {}", session.id(), e);
        }
    });
}

pub async fn list_styles() -> Json<&'static [StyleCategory]> {
    Json(STYLE_CATALOG.as_slice())
}

type AcceptedResult = Result<(StatusCode, Json<WorkflowView>), WorkflowError>;

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<WorkflowView>) {
    let session = Session::new(state.service.clone());
    tracing::info!("🆕 Session {} created", session.id());
    let view = session.view();
    state.sessions.write().insert(session.id().clone(), session);
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(Path(id): Path<String>, State(state): State<AppState>) -> ViewResult {
    Ok(Json(state.session(id)?.view()))
}

/// Forgets the session. A request still running for it finishes against its
/// own copy of the state and is then dropped with it.
pub async fn end_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, WorkflowError> {
    match state.sessions.write().remove(&SessionId::from(id.clone())) {
        Some(_) => {
            tracing::info!("👋 Session {} ended", id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(WorkflowError::UnknownSession(id)),
    }
}

// --- Item Collection ---

pub async fn reload_items(Path(id): Path<String>, State(state): State<AppState>) -> ViewResult {
    let session = state.session(id)?;
    session.collection().load_items().await?;
    Ok(Json(session.view()))
}

pub async fn submit_photo(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> ViewResult {
    let session = state.session(id)?;
    session.collection().submit_photo(ImagePayload::new(body)).await?;
    Ok(Json(session.view()))
}

pub async fn delete_item(
    Path((id, item_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ViewResult {
    let session = state.session(id)?;
    session.collection().delete_item(&item_id).await;
    Ok(Json(session.view()))
}

pub async fn choose_style(Path(id): Path<String>, State(state): State<AppState>) -> ViewResult {
    let session = state.session(id)?;
    session.collection().choose_style()?;
    Ok(Json(session.view()))
}

// --- Style Selection ---

pub async fn select_style(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<SelectStyleRequest>,
) -> ViewResult {
    let session = state.session(id)?;
    session.styles().select_style(&body.style_id)?;
    Ok(Json(session.view()))
}

pub async fn generate_outfit(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AcceptedResult {
    let session = state.session(id)?;
    session.styles().proceed()?;
    spawn_entry(session.clone());
    Ok((StatusCode::ACCEPTED, Json(session.view())))
}

pub async fn back_to_photos(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ViewResult {
    let session = state.session(id)?;
    session.styles().back_to_photos();
    Ok(Json(session.view()))
}

// --- Outfit Composition ---

pub async fn open_outfit(
    Path((id, style_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AcceptedResult {
    let session = state.session(id)?;
    session.composition().open(&style_id)?;
    spawn_entry(session.clone());
    Ok((StatusCode::ACCEPTED, Json(session.view())))
}

// Busy and validation failures are answered here; only the remote call runs
// in the background.
pub async fn regenerate(Path(id): Path<String>, State(state): State<AppState>) -> AcceptedResult {
    let session = state.session(id)?;
    let pending = session.composition().begin_regenerate()?;
    let background = session.clone();
    tokio::spawn(async move {
        if let Err(e) = background.composition().complete(pending).await {
            tracing::warn!("Regeneration for {} ended with: {}", background.id(), e);
        }
    });
    Ok((StatusCode::ACCEPTED, Json(session.view())))
}

pub async fn change_style(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ViewResult {
    let session = state.session(id)?;
    session.composition().change_style();
    Ok(Json(session.view()))
}

pub async fn add_more_items(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ViewResult {
    let session = state.session(id)?;
    session.composition().add_more_items();
    Ok(Json(session.view()))
}

pub async fn outfit_history(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<GeneratedOutfit>>, WorkflowError> {
    let session = state.session(id)?;
    Ok(Json(session.composition().history().await?))
}
