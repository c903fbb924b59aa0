//! # priomq
//!
//! `priomq` is a minimal priority-ordered message broker served over HTTP.
//! Producers push a payload with an integer priority; consumers pull the
//! highest-priority pending message, which is removed from the system as it
//! is delivered.
//!
//! ## Core Modules
//!
//! - `broker`: the in-memory priority queue and the `Broker` that binds it to
//!   the payload store.
//! - `persistence`: durable payload storage behind the `PayloadStore` trait
//!   (file, sled and in-memory backends).
//! - `transport`: the axum HTTP binding for `/push` and `/pull`.
//! - `config`: layered configuration loading.
//! - `utils`: error types and logging setup.
//!
//! Delivery order lives only in memory. Payloads left on disk by a previous
//! process are not re-queued at startup.

pub mod broker;
pub mod config;
pub mod persistence;
pub mod transport;
pub mod utils;
