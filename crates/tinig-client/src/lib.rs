//! Headless Tinig client.
//!
//! Holds the visitor's local view of the sky and every decision the page
//! makes on its own: which stars are still visible, what may be posted,
//! optimistic resonates, toasts and the release animation. A front end
//! only has to draw what [`SkySession`] reports.

pub mod backend;
pub mod cinematic;
pub mod session;
pub mod toast;

pub use backend::{ClientError, HttpBackend, SkyBackend};
pub use cinematic::Phase;
pub use session::{ResonateOutcome, SkySession, SubmitOutcome, resonate_label};
pub use toast::{Severity, Toast, ToastCenter};
