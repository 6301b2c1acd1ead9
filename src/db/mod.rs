mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::*;

const MONTH_START_DAY_KEY: &str = "month_start_day";

/// Record access consumed by the tracker.
///
/// Fetches return the full, ordered collections; aggregation happens on
/// those in memory.
pub(crate) trait Store {
    /// All transactions, newest date first.
    fn fetch_transactions(&self) -> Result<Vec<Transaction>>;
    /// All categories, by name.
    fn fetch_categories(&self) -> Result<Vec<Category>>;
    fn find_transaction(&self, id: Uuid) -> Result<Option<Transaction>>;
    fn find_category(&self, id: Uuid) -> Result<Option<Category>>;
    fn save_transaction(&self, txn: &Transaction) -> Result<()>;
    fn save_category(&self, category: &Category) -> Result<()>;
    /// Returns whether a row was removed.
    fn delete_transaction(&self, id: Uuid) -> Result<bool>;
    /// Returns whether a row was removed. Referencing transactions become uncategorized.
    fn delete_category(&self, id: Uuid) -> Result<bool>;
}

/// Persisted process-wide settings.
pub(crate) trait SettingsStore {
    fn month_start_day(&self) -> Result<MonthStartDay>;
    fn set_month_start_day(&self, day: MonthStartDay) -> Result<()>;
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "migrated database schema"
            );
        }

        Ok(())
    }
}

impl Store for Database {
    fn find_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, amount, currency, note, date, category_id, created_at
                 FROM transactions WHERE id = ?1",
                params![id.to_string()],
                transaction_from_row,
            )
            .optional()?)
    }

    fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, budget_limit, created_at FROM categories WHERE id = ?1",
                params![id.to_string()],
                category_from_row,
            )
            .optional()?)
    }

    fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, currency, note, date, category_id, created_at
             FROM transactions
             ORDER BY date DESC, created_at DESC",
        )?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn fetch_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, budget_limit, created_at
             FROM categories
             ORDER BY name COLLATE NOCASE, created_at",
        )?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn save_transaction(&self, txn: &Transaction) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO transactions (id, amount, currency, note, date, category_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    amount = ?2, currency = ?3, note = ?4, date = ?5, category_id = ?6",
                params![
                    txn.id.to_string(),
                    txn.amount.to_string(),
                    txn.currency,
                    txn.note,
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.category_id.map(|id| id.to_string()),
                    txn.created_at,
                ],
            )
            .with_context(|| format!("Failed to save transaction {}", txn.id))?;
        tracing::debug!(id = %txn.id, amount = %txn.amount, "saved transaction");
        Ok(())
    }

    fn save_category(&self, category: &Category) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO categories (id, name, budget_limit, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET name = ?2, budget_limit = ?3",
                params![
                    category.id.to_string(),
                    category.name,
                    category.budget_limit.map(|b| b.to_string()),
                    category.created_at,
                ],
            )
            .with_context(|| format!("Failed to save category {}", category.id))?;
        tracing::debug!(id = %category.id, name = category.display_name(), "saved category");
        Ok(())
    }

    fn delete_transaction(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id.to_string()])?;
        tracing::debug!(%id, removed, "deleted transaction");
        Ok(removed > 0)
    }

    fn delete_category(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])?;
        tracing::debug!(%id, removed, "deleted category");
        Ok(removed > 0)
    }
}

impl SettingsStore for Database {
    fn month_start_day(&self) -> Result<MonthStartDay> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![MONTH_START_DAY_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(value) = stored else {
            return Ok(MonthStartDay::default());
        };
        match value.parse::<u32>().ok().map(MonthStartDay::new) {
            Some(Ok(day)) => Ok(day),
            _ => {
                tracing::warn!(%value, "stored month start day is invalid, using default");
                Ok(MonthStartDay::default())
            }
        }
    }

    fn set_month_start_day(&self, day: MonthStartDay) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![MONTH_START_DAY_KEY, day.get().to_string()],
        )?;
        Ok(())
    }
}

fn parse_uuid(idx: usize, text: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: String = row.get(0)?;
    let amount_str: String = row.get(1)?;
    let date_str: String = row.get(4)?;
    let category_id: Option<String> = row.get(5)?;

    let amount = match Decimal::from_str(&amount_str) {
        Ok(amount) if amount_in_range(amount) => amount,
        _ => {
            tracing::warn!(%id, amount = %amount_str, "stored amount is invalid, using 0");
            Decimal::ZERO
        }
    };
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_else(|_| {
        tracing::warn!(%id, date = %date_str, "stored date is invalid, using today");
        chrono::Local::now().date_naive()
    });

    Ok(Transaction {
        id: parse_uuid(0, &id)?,
        amount,
        currency: row.get(2)?,
        note: row.get(3)?,
        date,
        category_id: category_id.as_deref().map(|c| parse_uuid(5, c)).transpose()?,
        created_at: row.get(6)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let id: String = row.get(0)?;
    let limit_str: Option<String> = row.get(2)?;
    let budget_limit = limit_str.and_then(|s| match Decimal::from_str(&s) {
        Ok(limit) => Some(limit),
        Err(_) => {
            tracing::warn!(%id, limit = %s, "stored budget limit is invalid, ignoring it");
            None
        }
    });

    Ok(Category {
        id: parse_uuid(0, &id)?,
        name: row.get(1)?,
        budget_limit,
        created_at: row.get(3)?,
    })
}
