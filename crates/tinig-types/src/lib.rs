//! Wire types shared by the Tinig server, gateway and client.

pub mod api;
pub mod events;
pub mod models;
