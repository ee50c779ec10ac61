pub mod tables;

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, WriteTransaction};

use crate::error::Result;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

/// Open or create the redb database at the given path
///
/// Creates all required tables on first run.
pub fn open_database(path: impl AsRef<Path>) -> Result<Db> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::create(path)?;

    // Initialize tables on first run
    let write_txn = db.begin_write()?;
    {
        // Create tables if they don't exist by opening them
        let _ = write_txn.open_table(tables::USERS)?;
        let _ = write_txn.open_table(tables::USERS_BY_EMAIL)?;
        let _ = write_txn.open_table(tables::TOKENS)?;
        let _ = write_txn.open_table(tables::VIDEOS)?;
        let _ = write_txn.open_table(tables::PURCHASES)?;
        let _ = write_txn.open_table(tables::COUNTERS)?;
    }
    write_txn.commit()?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Allocate the next id for the named counter within the given write
/// transaction. Ids start at 1 and increase monotonically, so descending
/// id order is newest-first.
pub fn next_id(write_txn: &WriteTransaction, counter: &str) -> Result<u64> {
    let mut counters = write_txn.open_table(tables::COUNTERS)?;
    let next = counters.get(counter)?.map(|v| v.value()).unwrap_or(1);
    counters.insert(counter, next + 1)?;
    Ok(next)
}

/// Counter name for user ids
pub const USER_IDS: &str = "user_ids";

/// Counter name for video ids
pub const VIDEO_IDS: &str = "video_ids";
