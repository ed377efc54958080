//! HTTP API Server Module
//!
//! Exposes the dispatcher as a JSON API: `POST /search` and `GET /health`.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
