use axum::{Json, extract::State};

use tinig_sky::{Mode, daynight, render_stars};
use tinig_types::api::SkyResponse;

use crate::error::ApiError;
use crate::stars::into_stars;
use crate::state::{AppState, with_db};

/// Most recent stars drawn in a night sky snapshot.
const SKY_STAR_LIMIT: u32 = 100;

/// GET /api/sky: the sky as the server's clock sees it right now.
pub async fn current_sky(State(state): State<AppState>) -> Result<Json<SkyResponse>, ApiError> {
    let local = state.clock.local_time();
    let mode = Mode::at(&local);

    let stars = if mode.is_night() {
        let rows = with_db(&state, |db| db.recent_stars(SKY_STAR_LIMIT)).await?;
        render_stars(&into_stars(rows), state.clock.now())
    } else {
        Vec::new()
    };

    Ok(Json(SkyResponse {
        night: mode.is_night(),
        celestial_rotation: daynight::celestial_rotation(&local),
        sky_color: mode.sky_color().to_string(),
        tagline: mode.tagline().to_string(),
        stars,
    }))
}
