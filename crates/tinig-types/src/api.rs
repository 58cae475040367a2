use serde::{Deserialize, Serialize};

use crate::models::Star;

// -- Stars --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStarRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonateResponse {
    pub id: String,
    pub likes: u64,
}

// -- Daily quote --

/// Body of `GET /api/daily-quote`. Always present, even when the
/// generator or the store failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub content: String,
    pub author: String,
}

// -- Sky --

/// Keyframed animation for one star, in the units the browser animates in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarAnimation {
    pub opacity: Vec<f64>,
    pub scale: Vec<f64>,
    pub duration_secs: f64,
    pub flicker: bool,
}

/// A star that is still alive, with its lifecycle already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedStar {
    #[serde(flatten)]
    pub star: Star,
    pub life_force: f64,
    pub critical: bool,
    pub animation: StarAnimation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyResponse {
    pub night: bool,
    /// Rotation of the sun/moon wheel in degrees; noon is 0.
    pub celestial_rotation: f64,
    pub sky_color: String,
    pub tagline: String,
    pub stars: Vec<RenderedStar>,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
