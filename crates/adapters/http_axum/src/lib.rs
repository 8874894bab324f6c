//! # playguard-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for programmatic access
//!   (`/api/entities`, `/api/devices`, `/api/events`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Route `POST /api/entities/{id}/services/{service}` through the
//!   [`ServiceCaller`](playguard_app::ports::ServiceCaller) port, which is how
//!   the time control switches, times and name are set
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `playguard-app` (for port traits and services) and `playguard-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
