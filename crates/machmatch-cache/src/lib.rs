//! SQLite-backed cache for scraped data.
//!
//! Two tables: enriched prospect records keyed by website URL, and exhibitor
//! listings keyed by provider name. All writes are `INSERT OR REPLACE`
//! (last write wins), so repeated runs are idempotent. A row that fails to
//! decode is treated as a cache miss, never as a fatal error.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::warn;

use machmatch_core::{Prospect, Provider, Tier};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to open cache database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("cache query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Cache over a local SQLite file (or an in-memory database in tests).
pub struct MatchCache {
    conn: Mutex<Connection>,
}

impl MatchCache {
    /// Opens or creates the cache database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Open`] when the file cannot be opened and
    /// [`CacheError::Query`] when schema creation fails.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(CacheError::Open)?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Opens a throwaway in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory().map_err(CacheError::Open)?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prospect_data (
                url TEXT PRIMARY KEY,
                company TEXT,
                data TEXT,
                scraped_at TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS exhibitors (
                name TEXT UNIQUE,
                url TEXT,
                hall TEXT,
                stand TEXT,
                country TEXT,
                products TEXT,
                scraped_at TEXT
            )",
            [],
        )?;
        Ok(())
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a cached enriched prospect by website URL.
    ///
    /// A row whose JSON no longer decodes is logged and reported as a miss.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Query`] on database failures.
    pub fn get_prospect(&self, url: &str) -> Result<Option<Prospect>, CacheError> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare("SELECT data FROM prospect_data WHERE url = ?1")?;
        let row: Result<String, rusqlite::Error> = stmt.query_row(params![url], |row| row.get(0));
        match row {
            Ok(data) => match serde_json::from_str::<Prospect>(&data) {
                Ok(prospect) => Ok(Some(prospect)),
                Err(error) => {
                    warn!(url, %error, "discarding undecodable cached prospect row");
                    Ok(None)
                }
            },
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Stores an enriched prospect keyed by its website URL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Query`] on database failures.
    pub fn put_prospect(&self, url: &str, prospect: &Prospect) -> Result<(), CacheError> {
        let data = serde_json::to_string(prospect).map_err(|error| {
            CacheError::Query(rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
        })?;
        let conn = self.lock_conn();
        conn.execute(
            "INSERT OR REPLACE INTO prospect_data (url, company, data, scraped_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![url, prospect.name, data, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns all cached exhibitor listings, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Query`] on database failures.
    pub fn exhibitors(&self) -> Result<Vec<Provider>, CacheError> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(
            "SELECT name, url, hall, stand, country, products
             FROM exhibitors ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            let products: Option<String> = row.get(5)?;
            Ok(Provider {
                name: row.get(0)?,
                country: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                tier: Tier::default(),
                url: row.get(1)?,
                hall: row.get(2)?,
                stand: row.get(3)?,
                products: products
                    .map(|p| {
                        p.split(';')
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                specialty: None,
            })
        })?;
        let mut providers = Vec::new();
        for row in rows {
            providers.push(row?);
        }
        Ok(providers)
    }

    /// Stores exhibitor listings, replacing any existing row with the same
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Query`] on database failures.
    pub fn put_exhibitors(&self, providers: &[Provider]) -> Result<(), CacheError> {
        let conn = self.lock_conn();
        let now = Utc::now().to_rfc3339();
        for provider in providers {
            conn.execute(
                "INSERT OR REPLACE INTO exhibitors
                 (name, url, hall, stand, country, products, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    provider.name,
                    provider.url,
                    provider.hall,
                    provider.stand,
                    provider.country,
                    provider.products.join(";"),
                    now,
                ],
            )?;
        }
        Ok(())
    }

    /// Number of cached exhibitor listings.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Query`] on database failures.
    pub fn exhibitor_count(&self) -> Result<usize, CacheError> {
        let conn = self.lock_conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM exhibitors", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
