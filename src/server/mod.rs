//! Network-facing service layer

pub mod http;

pub use http::HttpServer;
