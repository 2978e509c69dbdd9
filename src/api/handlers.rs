use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AddOutcome, FavoriteEntry, GenreCount, Recommendation, RecommendationView, SessionState,
    WatchHistoryEntry,
};
use crate::services::{enrich, run_cycle, CycleOutcome};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
    pub favorites: Vec<FavoriteEntry>,
    pub watch_history: Vec<WatchHistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DayDescriptionRequest {
    pub day_description: String,
}

/// Points at one entry of the session's current recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationIndexRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub status: AddOutcome,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub omdb_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigureResponse {
    pub llm_reconfigured: bool,
    pub metadata_reconfigured: bool,
}

fn recommendation_at(state: &SessionState, index: usize) -> AppResult<Recommendation> {
    state
        .recommendations()
        .get(index)
        .cloned()
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No recommendation at index {} ({} available)",
                index,
                state.recommendations().len()
            ))
        })
}

fn non_blank(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Start a new session with empty state
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state
        .sessions
        .create(state.llm.clone(), state.metadata.clone())
        .await;

    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// Snapshot of a session's recommendations, favorites and history
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;

    Ok(Json(SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
        recommendations: session.state.recommendations().to_vec(),
        favorites: session.state.favorites().to_vec(),
        watch_history: session.state.watch_history().to_vec(),
    }))
}

/// End a session and discard its state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Analyze a day description and generate a fresh recommendation set
pub async fn request_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DayDescriptionRequest>,
) -> AppResult<Json<CycleOutcome>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let llm = session.llm();

    let outcome = run_cycle(llm.as_ref(), &mut session.state, &request.day_description).await?;

    tracing::info!(
        session_id = %id,
        recommendations = outcome.recommendations.len(),
        "Recommendation cycle completed"
    );

    Ok(Json(outcome))
}

/// Current recommendations with freshly fetched metadata
pub async fn list_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<RecommendationView>>> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;

    let views = enrich(session.metadata(), session.state.recommendations()).await;
    Ok(Json(views))
}

/// Drop the current recommendations, keeping favorites and history
pub async fn clear_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let handle = state.sessions.get(id).await?;
    handle.lock().await.state.clear_recommendations();
    Ok(StatusCode::NO_CONTENT)
}

/// Save one of the current recommendations as a favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecommendationIndexRequest>,
) -> AppResult<Json<AddResponse>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let rec = recommendation_at(&session.state, request.index)?;
    let status = session.state.add_favorite(&rec);

    Ok(Json(AddResponse {
        status,
        title: rec.title,
    }))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<FavoriteEntry>>> {
    let handle = state.sessions.get(id).await?;
    let favorites = handle.lock().await.state.favorites().to_vec();
    Ok(Json(favorites))
}

/// Mark one of the current recommendations as watched today
///
/// The genre comes from a metadata lookup; if that fails the entry is still
/// recorded with an unknown genre. Movies already in the history are reported
/// without a lookup.
pub async fn mark_watched(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecommendationIndexRequest>,
) -> AppResult<Json<AddResponse>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let rec = recommendation_at(&session.state, request.index)?;
    if session.state.has_watched(&rec) {
        return Ok(Json(AddResponse {
            status: AddOutcome::AlreadyPresent,
            title: rec.title,
        }));
    }

    let genre = match session.metadata().lookup(&rec.title, &rec.year).await {
        Ok(detail) => Some(detail.genre),
        Err(e) => {
            tracing::warn!(error = %e, title = %rec.title, "No genre for watched movie");
            None
        }
    };

    let status = session
        .state
        .add_watched(&rec, genre.as_deref(), Local::now().date_naive());

    Ok(Json(AddResponse {
        status,
        title: rec.title,
    }))
}

pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<WatchHistoryEntry>>> {
    let handle = state.sessions.get(id).await?;
    let history = handle.lock().await.state.watch_history().to_vec();
    Ok(Json(history))
}

/// Genre distribution of the watch history
pub async fn get_insights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<GenreCount>>> {
    let handle = state.sessions.get(id).await?;
    let distribution = handle.lock().await.state.genre_distribution();
    Ok(Json(distribution))
}

/// Replace this session's service clients with ones using the user's own keys
pub async fn configure_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfigureRequest>,
) -> AppResult<Json<ConfigureResponse>> {
    let gemini_key = non_blank(request.gemini_api_key);
    let omdb_key = non_blank(request.omdb_api_key);

    if gemini_key.is_none() && omdb_key.is_none() {
        return Err(AppError::InvalidInput(
            "Provide a Gemini or OMDb API key".to_string(),
        ));
    }

    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let response = ConfigureResponse {
        llm_reconfigured: gemini_key.is_some(),
        metadata_reconfigured: omdb_key.is_some(),
    };

    if let Some(key) = gemini_key {
        session.set_llm(state.settings.gemini_client(key));
    }
    if let Some(key) = omdb_key {
        session.set_metadata(state.settings.omdb_provider(key));
    }

    tracing::info!(
        session_id = %id,
        llm = response.llm_reconfigured,
        metadata = response.metadata_reconfigured,
        "Session clients reconfigured"
    );

    Ok(Json(response))
}
