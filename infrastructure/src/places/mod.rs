//! Places lookup adapters

pub mod http;

pub use http::HttpPlacesGateway;
