use std::time::Duration;

use serde::Serialize;

/// Where the submission form is in its release animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    /// Request in flight, before the server has answered.
    Submitting,
    Spark,
    Shoot,
    Dot,
    Success,
}

const SPARK_END: Duration = Duration::from_millis(550);
const SHOOT_END: Duration = Duration::from_millis(1_400);
const DOT_END: Duration = Duration::from_millis(1_900);
const SUCCESS_END: Duration = Duration::from_millis(5_100);

/// Total length of the release animation.
pub const CINEMATIC_LENGTH: Duration = SUCCESS_END;

impl Phase {
    /// Phase of the timeline `elapsed` after a successful release.
    pub fn at(elapsed: Duration) -> Self {
        if elapsed < SPARK_END {
            Self::Spark
        } else if elapsed < SHOOT_END {
            Self::Shoot
        } else if elapsed < DOT_END {
            Self::Dot
        } else if elapsed < SUCCESS_END {
            Self::Success
        } else {
            Self::Idle
        }
    }

    /// The form accepts a new message only when idle.
    pub fn accepts_input(self) -> bool {
        self == Self::Idle
    }
}
