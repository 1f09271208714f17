//! Embedded Diesel migrations and a startup runner.
//!
//! Migrations are compiled into the binary from `migrations/`, so a deployed
//! server needs no migration files on disk. The runner uses a dedicated
//! synchronous connection; it executes once during startup before the pool
//! and listener come up.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

const EMBEDDED_MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying embedded migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("migration connection failed: {message}")]
    Connection {
        /// Human-readable failure description.
        message: String,
    },
    /// A migration failed while executing.
    #[error("migration execution failed: {message}")]
    Execution {
        /// Human-readable failure description.
        message: String,
    },
}

impl MigrationError {
    fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Apply all embedded migrations that have not yet run.
///
/// Returns the names of the migrations applied by this call, oldest first.
pub fn apply_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut connection = PgConnection::establish(database_url)
        .map_err(|error| MigrationError::connection(error.to_string()))?;
    let applied = connection
        .run_pending_migrations(EMBEDDED_MIGRATIONS)
        .map_err(|error| MigrationError::execution(error.to_string()))?;
    Ok(applied.iter().map(ToString::to_string).collect())
}
