//! SQLite-based product sink
//!
//! Records land in a single `products` table keyed by product URL.

use crate::output::traits::{OutputResult, ProductRecord, ProductSink};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the products table
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL,
    product_url TEXT NOT NULL UNIQUE,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_domain ON products(domain);
"#;

/// Product sink writing to a SQLite database
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database and ensures the schema exists
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Number of stored products
    pub fn count(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl ProductSink for SqliteSink {
    fn write(&mut self, record: &ProductRecord) -> OutputResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO products (domain, product_url, discovered_at) VALUES (?1, ?2, ?3)",
            params![record.domain, record.product_url, now],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        let count = self.count()?;
        tracing::debug!("SQLite output holds {} products", count);
        Ok(())
    }
}
