//! # Lichtbild Backend Library
//!
//! This is the core library for Lichtbild, a social photo sharing backend.
//! Lichtbild exposes login, follow/ban, photo upload, like and comment
//! endpoints over a SQLite store, and builds visibility-filtered, paginated
//! photo listings (user galleries and the home stream).
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: Modern web framework for HTTP server and routing
//! - **SQLx**: Asynchronous database operations with SQLite
//! - **Tokio**: Async runtime for concurrent operations
//! - **Serde**: Serialization/deserialization for JSON APIs
//!
//! ## Core Components
//!
//! - [`query`]: Relation fragments and the query composer
//! - [`workers`]: Concurrent fan-out/fan-in job aggregator
//! - [`pagination`]: Paginated response assembly
//! - [`repo`]: Repositories and their relation constructors
//! - [`service`]: Business rules (visibility, bans, media persistence)
//! - [`routes`]: HTTP API endpoint handlers
//! - [`middleware`]: Bearer-token authentication
//! - [`config`], [`db`], [`error`], [`metrics`], [`state`], [`types`]:
//!   configuration, schema setup, error handling, counters, shared state
//!   and data transfer objects

pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod metrics;
pub mod middleware;
pub mod pagination;
pub mod query;
pub mod repo;
pub mod routes;
pub mod service;
pub mod state;
pub mod types;
pub mod workers;

#[cfg(test)]
mod tests;
