pub mod ambient;
pub mod connection;
pub mod dispatcher;
