//! # playguard-domain
//!
//! Pure domain model for the playguard playback-curfew hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, time of day
//! - Define **Entities** (state holders with identity: media players, switches, times, texts)
//! - Define **Devices** (physical or virtual things that expose one or more entities)
//! - Define **Services** (commands: `turn_on`, `media_stop`, `speak`, …)
//! - Define **Events** (state-change records)
//! - Define the **time-window policy** and the per-player **control record**
//! - Render the spoken **notices** issued when playback is interrupted
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod control;
pub mod device;
pub mod entity;
pub mod event;
pub mod notice;
pub mod policy;
pub mod service;
