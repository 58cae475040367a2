use serde::{Deserialize, Serialize};

use crate::models::Star;

/// Events pushed to every browser over the WebSocket gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SkyEvent {
    /// Someone released a new star
    StarCreate { star: Star },

    /// A star's resonate count changed
    StarResonate { id: String, likes: u64 },

    /// The clock crossed 06:00 or 18:00
    ModeChange { night: bool },

    /// Ambient: a shooting star crosses the night sky
    ShootingStar { from_x: u8, from_y: u8, angle: i16 },

    /// Ambient: a bird crosses the day sky
    BirdFlight { altitude: u8, leftward: bool },
}

impl SkyEvent {
    /// Cosmetic events from the ambient schedule.
    pub fn is_ambient(&self) -> bool {
        matches!(self, Self::ShootingStar { .. } | Self::BirdFlight { .. })
    }
}
