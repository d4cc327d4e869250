use super::UsageStore;
use crate::{
    error::AlertResult,
    source::{Branch, BranchCatalog},
};
use rusqlite::params;

impl UsageStore {
    // ── Branch ────────────────────────────────────────────────────

    /// Insert or replace a branch. Catalog order is `sort_order`, then code.
    pub fn upsert_branch(&self, branch: &Branch, sort_order: i64) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO branch (code, name, sort_order) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET name = excluded.name, sort_order = excluded.sort_order",
            params![&branch.code, &branch.name, sort_order],
        )?;
        Ok(())
    }

    pub fn branches(&self) -> AlertResult<Vec<Branch>> {
        let mut stmt = self.conn.prepare(
            "SELECT code, name FROM branch ORDER BY sort_order ASC, code ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Branch {
                code: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl BranchCatalog for UsageStore {
    fn list_branches(&self) -> AlertResult<Vec<Branch>> {
        self.branches()
    }
}
