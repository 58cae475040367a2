//! Tinig sky policy: the decisions the night sky makes about its stars.
//!
//! Everything here is a pure function of its inputs (or of an injected
//! RNG), so the server and the client share one definition of:
//! - how long a star lives and when it starts to flicker
//! - which words never reach the sky
//! - when it is night
//! - where new stars are placed

pub mod clock;
pub mod daynight;
pub mod filter;
pub mod lifecycle;
pub mod placement;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use daynight::{Mode, is_night};
pub use filter::{ContentPolicy, Denylist, Rejection};
pub use lifecycle::{Vitals, render_star, render_stars};
