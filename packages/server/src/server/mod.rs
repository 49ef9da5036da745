// HTTP server setup (Axum)
pub mod app;
pub mod render;
pub mod routes;

pub use app::*;
