pub mod setcards;
pub mod tables;
pub mod users;

use redb::{Database, Error as RedbError};
use std::path::Path;
use std::sync::Arc;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

/// Open or create the redb database at the given path
///
/// Creates all required tables on first run.
#[allow(clippy::result_large_err)]
pub fn open_database(path: impl AsRef<Path>) -> Result<Db, RedbError> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                RedbError::Io(e)
            })?;
        }
    }

    let db = Database::create(path)?;
    init_tables(&db)?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Create tables if they don't exist by opening them in a write transaction
#[allow(clippy::result_large_err)]
pub fn init_tables(db: &Database) -> Result<(), RedbError> {
    let write_txn = db.begin_write()?;
    {
        let _ = write_txn.open_table(tables::USERS)?;
        let _ = write_txn.open_table(tables::SETCARDS)?;
    }
    write_txn.commit()?;
    Ok(())
}
