use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use tinig_db::models::StarRow;
use tinig_sky::placement;
use tinig_types::api::{CreateStarRequest, ResonateResponse};
use tinig_types::events::SkyEvent;
use tinig_types::models::Star;

use crate::error::ApiError;
use crate::state::{AppState, with_db};

pub const MAX_CONTENT_CHARS: usize = 280;
const MAX_LIMIT: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct StarQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Convert rows, skipping any the sky cannot draw.
pub(crate) fn into_stars(rows: Vec<StarRow>) -> Vec<Star> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            Star::try_from(row)
                .map_err(|e| warn!("Skipping unreadable star '{}': {:#}", id, e))
                .ok()
        })
        .collect()
}

/// GET /api/stars: most recent first.
pub async fn list_stars(
    State(state): State<AppState>,
    query: Result<Query<StarQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.min(MAX_LIMIT);
    let rows = with_db(&state, move |db| db.recent_stars(limit)).await?;
    Ok(Json(into_stars(rows)))
}

/// POST /api/stars: filter, place and store a new star.
pub async fn create_star(
    State(state): State<AppState>,
    req: Result<Json<CreateStarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::EmptyMessage);
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::TooLong(MAX_CONTENT_CHARS));
    }
    if let Err(rejection) = state.policy.check(&content) {
        warn!("Refused star matching denylist word '{}'", rejection.word);
        return Err(ApiError::Rejected(rejection.message));
    }

    let (pos_x, pos_y) = placement::place(&mut rand::rng());
    let id = Uuid::new_v4().to_string();

    let row = with_db(&state, move |db| db.insert_star(&id, &content, pos_x, pos_y)).await?;
    let star = Star::try_from(row)?;

    info!("Star {} released at ({}, {})", star.id, star.pos_x, star.pos_y);
    state.dispatcher.broadcast(SkyEvent::StarCreate { star: star.clone() });

    Ok((StatusCode::CREATED, Json(star)))
}

/// POST /api/stars/{id}/resonate: atomic +1.
pub async fn resonate(
    State(state): State<AppState>,
    Path(star_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = star_id.clone();
    let likes = with_db(&state, move |db| db.increment_likes(&id))
        .await?
        .ok_or(ApiError::StarNotFound)?;

    state.dispatcher.broadcast(SkyEvent::StarResonate {
        id: star_id.clone(),
        likes,
    });

    Ok(Json(ResonateResponse { id: star_id, likes }))
}
