//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Transactional writes**: Watchlist mutations and their outbox events
//!   commit in one transaction, so downstream consumers never observe a
//!   change without its event.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselWatchlistRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/mydb");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselWatchlistRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_directory;
mod diesel_watchlist_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_directory::DieselUserDirectory;
pub use diesel_watchlist_repository::DieselWatchlistRepository;
pub use migrations::{MigrationError, apply_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
