//! SQLite persistence for the branch catalog and monthly usage.
//!
//! RULE: Only store/ talks to the database.
//! The engine reads through the `BranchCatalog` and `UsageSource` traits.

use crate::error::AlertResult;
use rusqlite::Connection;

mod branch;
mod usage;

pub struct UsageStore {
    conn: Connection,
}

impl UsageStore {
    pub fn open(path: &str) -> AlertResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AlertResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Create the schema if it does not exist yet.
    pub fn migrate(&self) -> AlertResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_usage.sql"))?;
        Ok(())
    }
}
