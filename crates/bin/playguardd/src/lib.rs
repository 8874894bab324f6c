//! # playguardd: playguard daemon
//!
//! Composition root that wires all adapters together.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Set up the integrations (virtual players, then time control)
//! - Spawn the playback guard and the event recorder on the event bus
//! - Build the axum router, injecting application services
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

pub mod config;
pub mod hub;
pub mod runtime;
