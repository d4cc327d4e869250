use super::UsageStore;
use crate::{
    error::AlertResult,
    period::Period,
    source::{UsageRecord, UsageSource},
    types::FiscalYear,
};
use rusqlite::params;

impl UsageStore {
    // ── Usage ─────────────────────────────────────────────────────

    pub fn insert_usage(
        &self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
        record: &UsageRecord,
    ) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO usage_record (branch_code, period, fiscal_year, customer_code, usage_qty)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                branch_code,
                period.key(),
                fiscal_year,
                &record.customer_code,
                record.usage,
            ],
        )?;
        Ok(())
    }

    /// Insert a batch in one transaction.
    pub fn insert_usage_batch(
        &mut self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
        records: &[UsageRecord],
    ) -> AlertResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO usage_record (branch_code, period, fiscal_year, customer_code, usage_qty)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for r in records {
                stmt.execute(params![branch_code, period.key(), fiscal_year, &r.customer_code, r.usage])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    pub fn usage_for(
        &self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
    ) -> AlertResult<Vec<UsageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_code, usage_qty FROM usage_record
             WHERE branch_code = ?1 AND period = ?2 AND fiscal_year = ?3
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![branch_code, period.key(), fiscal_year], |row| {
            Ok(UsageRecord {
                customer_code: row.get(0)?,
                usage:         row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn usage_count(&self) -> AlertResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM usage_record", [], |row| row.get(0))?;
        Ok(n)
    }
}

impl UsageSource for UsageStore {
    fn fetch_usage(
        &self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
    ) -> AlertResult<Vec<UsageRecord>> {
        self.usage_for(branch_code, period, fiscal_year)
    }
}
