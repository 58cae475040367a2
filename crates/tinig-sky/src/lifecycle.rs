use chrono::{DateTime, Utc};

use tinig_types::api::{RenderedStar, StarAnimation};
use tinig_types::models::Star;

/// A star fades linearly to nothing over three days.
pub const LIFESPAN_HOURS: f64 = 72.0;

/// The last two hours of a star's life are rendered as a flicker.
pub const CRITICAL_HOURS: f64 = 2.0;

const MS_PER_HOUR: f64 = 3_600_000.0;
const FLICKER_DURATION_SECS: f64 = 0.35;

/// Lifecycle state of one star at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub hours_old: f64,
    /// 1.0 fresh, 0.0 gone.
    pub life_force: f64,
    pub critical: bool,
}

impl Vitals {
    pub fn at(created: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let hours_old = (now - created).num_milliseconds() as f64 / MS_PER_HOUR;
        // Clock skew can put a star in the future; treat it as brand new.
        let life_force = (1.0 - hours_old / LIFESPAN_HOURS).clamp(0.0, 1.0);
        let remaining = LIFESPAN_HOURS - hours_old;
        let critical = remaining > 0.0 && remaining <= CRITICAL_HOURS;

        Self {
            hours_old,
            life_force,
            critical,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.life_force > 0.0
    }
}

/// Per-star pulse length in seconds, 2.0..=5.0, derived from the last two
/// hex digits of the id so that every client animates a star the same way.
pub fn pulse_duration(id: &str) -> f64 {
    let seed = id
        .get(id.len().saturating_sub(2)..)
        .and_then(|tail| u8::from_str_radix(tail, 16).ok())
        .unwrap_or(0);
    2.0 + (f64::from(seed) / 255.0) * 3.0
}

pub fn animation(id: &str, vitals: &Vitals) -> StarAnimation {
    let lf = vitals.life_force;
    if vitals.critical {
        StarAnimation {
            opacity: vec![lf, lf * 0.15, lf * 0.8, lf * 0.1, lf],
            scale: vec![lf, lf * 0.85, lf],
            duration_secs: FLICKER_DURATION_SECS,
            flicker: true,
        }
    } else {
        StarAnimation {
            opacity: vec![lf * 0.4, lf, lf * 0.4],
            scale: vec![lf],
            duration_secs: pulse_duration(id),
            flicker: false,
        }
    }
}

/// Apply the lifecycle to a star. Dead stars yield `None` and must not be
/// drawn.
pub fn render_star(star: &Star, now: DateTime<Utc>) -> Option<RenderedStar> {
    let vitals = Vitals::at(star.created_at, now);
    if !vitals.is_visible() {
        return None;
    }

    Some(RenderedStar {
        animation: animation(&star.id, &vitals),
        life_force: vitals.life_force,
        critical: vitals.critical,
        star: star.clone(),
    })
}

pub fn render_stars<'a, I>(stars: I, now: DateTime<Utc>) -> Vec<RenderedStar>
where
    I: IntoIterator<Item = &'a Star>,
{
    stars.into_iter().filter_map(|s| render_star(s, now)).collect()
}
