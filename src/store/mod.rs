//! SQLite persistence for harvested relationships and structures.

pub mod schema;
pub mod script;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{params, types::ValueRef, Connection};
use tracing::{error, info};

use crate::error::StoreResult;

pub use self::schema::{PairTable, StructureTable};

/// Outcome of a batched relationship load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Rows actually added; pairs already present are ignored.
    pub inserted: usize,
    pub batches: usize,
    pub failed_batches: usize,
}

/// One connection to the gene explorer database. Open one per worker call;
/// connections are never shared across threads.
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.busy_timeout(Duration::from_secs(30))?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the maintained tables and indexes if they are missing.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        info!(path = %self.path.display(), "schema ensured");
        Ok(())
    }

    /// Trade durability for insert throughput.
    pub fn tune_for_bulk_load(&self) -> StoreResult<()> {
        self.conn.pragma_update(None, "synchronous", "OFF")?;
        self.conn.pragma_update(None, "cache_size", -64_000)?;
        self.conn.pragma_update(None, "auto_vacuum", 0)?;
        let mode: String =
            self.conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        info!(journal_mode = %mode, "bulk load pragmas applied");
        Ok(())
    }

    /// Every value of `column` in `table`, as text.
    pub fn column_values(&self, table: &str, column: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {column} FROM {table}"))?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    /// Every `(first, second)` row of `table`.
    pub fn column_pairs(
        &self,
        table: &str,
        first: &str,
        second: &str,
    ) -> StoreResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {first}, {second} FROM {table}"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pairs(&self, table: PairTable) -> StoreResult<Vec<(String, String)>> {
        let (first, second) = table.columns();
        self.column_pairs(table.name(), first, second)
    }

    /// Insert `pairs` with conflict-ignore semantics, `batch_size` rows per
    /// transaction. A failing batch is rolled back and logged; later batches
    /// still run.
    pub fn insert_pairs(
        &mut self,
        table: PairTable,
        pairs: &[(String, String)],
        batch_size: usize,
    ) -> BatchReport {
        let (first, second) = table.columns();
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({first}, {second}) VALUES (?1, ?2)",
            table.name()
        );
        let mut report = BatchReport::default();
        for (idx, batch) in pairs.chunks(batch_size.max(1)).enumerate() {
            report.batches += 1;
            match self.insert_batch(&sql, batch) {
                Ok(inserted) => {
                    report.inserted += inserted;
                    info!(table = table.name(), batch = idx + 1, rows = batch.len(), inserted, "saved batch");
                }
                Err(err) => {
                    report.failed_batches += 1;
                    error!(table = table.name(), batch = idx + 1, %err, "batch rolled back");
                }
            }
        }
        report
    }

    fn insert_batch(&mut self, sql: &str, batch: &[(String, String)]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for (first, second) in batch {
                inserted += stmt.execute(params![first, second])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Store one structure, replacing any previous SMILES for `id`.
    pub fn upsert_structure(&self, table: StructureTable, id: &str, smiles: &str) -> StoreResult<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} ({}, smiles) VALUES (?1, ?2)",
                table.name(),
                table.key_column()
            ),
            params![id, smiles],
        )?;
        Ok(())
    }

    pub fn count(&self, table: &str) -> StoreResult<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct values of `column` in `table`.
    pub fn distinct_count(&self, table: &str, column: &str) -> StoreResult<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(DISTINCT {column}) FROM {table}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Run a generated SQL script against this database.
    pub fn apply_script<P: AsRef<Path>>(&self, script: P) -> StoreResult<()> {
        let sql = std::fs::read_to_string(script.as_ref())?;
        self.conn.execute_batch(&sql)?;
        info!(script = %script.as_ref().display(), "applied sql script");
        Ok(())
    }

    /// Dump `table` to `dest` as CSV with a header row. Returns the row count.
    pub fn export_csv<P: AsRef<Path>>(&self, table: &str, dest: P) -> StoreResult<usize> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {table}"))?;
        let headers: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut writer = csv::Writer::from_path(dest)?;
        writer.write_record(&headers)?;

        let mut rows = stmt.query([])?;
        let mut count = 0usize;
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(headers.len());
            for idx in 0..headers.len() {
                record.push(render(row.get_ref(idx)?));
            }
            writer.write_record(&record)?;
            count += 1;
        }
        writer.flush()?;
        info!(%table, rows = count, path = %dest.display(), "exported csv");
        Ok(count)
    }
}

fn render(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
