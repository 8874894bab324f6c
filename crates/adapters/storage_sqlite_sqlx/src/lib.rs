//! # playguard-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `playguard-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Companion entity values (switches, times, name) live in the `entities`
//! table, so they survive restarts.
//!
//! ## Dependency rule
//! Depends on `playguard-app` (for port traits) and `playguard-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;
mod device_repo;
mod entity_repo;
mod error;
mod event_store;
mod pool;

pub use device_repo::SqliteDeviceRepository;
pub use entity_repo::SqliteEntityRepository;
pub use error::StorageError;
pub use event_store::SqliteEventStore;
pub use pool::{Config, Database};
