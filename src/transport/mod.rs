//! The `transport` module binds the broker to HTTP.
//!
//! It defines the JSON request and response bodies and the axum server that
//! maps `/push` and `/pull` onto `Broker::push` and `Broker::pull`.

pub mod http;
pub mod message;

pub use http::{AppState, router, start_http_server};

#[cfg(test)]
mod tests;
