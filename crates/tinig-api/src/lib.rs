pub mod error;
pub mod generator;
pub mod quotes;
pub mod routes;
pub mod sky;
pub mod stars;
pub mod state;

pub use routes::router;
pub use state::{AppState, AppStateInner};
