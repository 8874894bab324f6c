//! # playguard-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `EntityRepository`: CRUD for entities
//!   - `DeviceRepository`: CRUD for devices
//!   - `EventStore`: append & query events
//!   - `Integration` / `IntegrationContext`: integration lifecycle
//!   - `ServiceCaller`: route service calls to the owning integration
//!   - `MediaPlayerControl`: speak on and stop a media player
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EntityService`: register, update state, list, get
//!   - `DeviceService`: register, list, get
//!   - `PlaybackGuard`: enforce the allowed-time window on playback starts
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `playguard-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod event_recorder;
pub mod playback_guard;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
