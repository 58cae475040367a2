use chrono::Timelike;

/// Night begins at 18:00 and ends at 06:00 local time.
pub fn is_night(hour: u32) -> bool {
    hour >= 18 || hour < 6
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Submission form is shown.
    Day,
    /// Star board and reading box are shown.
    Night,
}

impl Mode {
    pub fn at<T: Timelike>(time: &T) -> Self {
        if is_night(time.hour()) {
            Self::Night
        } else {
            Self::Day
        }
    }

    pub fn is_night(self) -> bool {
        self == Self::Night
    }

    pub fn sky_color(self) -> &'static str {
        match self {
            Self::Night => "#020617",
            Self::Day => "#38bdf8",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Self::Night => "Ang mga salitang hindi masabi",
            Self::Day => "Pakawalan ang iyong dinadala",
        }
    }
}

/// Rotation of the sun/moon wheel in degrees: noon 0, 18:00 90,
/// 06:00 -90, midnight -180.
pub fn celestial_rotation<T: Timelike>(time: &T) -> f64 {
    let precise_hour = f64::from(time.hour()) + f64::from(time.minute()) / 60.0;
    (precise_hour - 12.0) * 15.0
}
