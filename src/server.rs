use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{instrument, warn};

use crate::{
    error::{PlaylistError, Result},
    loader::Loader,
    playlist::{Dialect, PlaylistEntry},
    store::PlaylistStore,
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PlaylistStore,
    pub loader: Arc<Loader>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u64>,
    size: Option<u64>,
}

impl PageQuery {
    /// Returns the validated `(page, size)` pair
    fn resolve(&self) -> Result<(usize, usize)> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || size == 0 {
            return Err(PlaylistError::validation(
                "page and size must be positive integers",
            ));
        }

        // Too large for the target means past the end anyway
        let page = usize::try_from(page).unwrap_or(usize::MAX);
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        Ok((page, size))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub source: String,
    pub count: usize,
    pub dialect: Option<Dialect>,
    pub loaded_at: Option<DateTime<Utc>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reload", post(reload))
        .route("/playlist", get(list_playlist))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /reload
#[instrument(skip(state))]
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>> {
    let count = state.loader.reload(&state.store).await.inspect_err(|e| {
        warn!("Reload failed: {e}");
    })?;

    Ok(Json(ReloadResponse {
        status: "ok".to_string(),
        count,
    }))
}

/// GET /playlist?page=&size=
async fn list_playlist(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<PlaylistEntry>>> {
    let Query(query) = query.map_err(|e| PlaylistError::validation(e.body_text()))?;
    let (page, size) = query.resolve()?;

    let snapshot = state.store.snapshot();
    Ok(Json(snapshot.page(page, size).to_vec()))
}

/// GET /status
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.store.snapshot();

    Json(StatusResponse {
        source: state.loader.source.to_string(),
        count: snapshot.entries.len(),
        dialect: snapshot.dialect,
        loaded_at: snapshot.loaded_at,
    })
}
