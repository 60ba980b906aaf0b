//! REST server for the simple-rag service
//!
//! Uses axum for routing; every non-trivial operation is delegated to the
//! embedding provider and the vector database behind `services`.

pub mod config;
pub mod extract;
pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod startup;
pub mod types;
