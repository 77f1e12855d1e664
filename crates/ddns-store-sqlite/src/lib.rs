// # SQLite Domain Store
//
// Durable `DomainStore` over a single `ddns` table.
//
// ## Schema
//
// ```sql
// ddns(id INTEGER PRIMARY KEY, domain TEXT UNIQUE NOT NULL,
//      token TEXT NOT NULL, ip TEXT, updated TEXT)
// ```
//
// The table is created by the embedded migrations on connect. `domain`
// uniqueness is enforced by the database, so concurrent registrations of the
// same name cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ddns_core::traits::{DomainRecord, DomainStore};
use ddns_core::{Error, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

#[derive(sqlx::FromRow)]
struct DdnsRow {
    domain: String,
    token: String,
    ip: Option<String>,
    updated: Option<DateTime<Utc>>,
}

impl From<DdnsRow> for DomainRecord {
    fn from(row: DdnsRow) -> Self {
        DomainRecord {
            domain: row.domain,
            token: row.token,
            last_ip: row.ip,
            updated_at: row.updated,
        }
    }
}

/// Domain store persisted in SQLite
#[derive(Debug, Clone)]
pub struct SqliteDomainStore {
    pool: SqlitePool,
}

impl SqliteDomainStore {
    /// Open (creating if missing) the database at `url` and run migrations
    ///
    /// `url` is a sqlx SQLite URL such as `sqlite://ddns.db` or
    /// `sqlite::memory:`. In-memory databases get a single connection so every
    /// query sees the same database.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::config(format!("Invalid DATABASE_URI: {}", e)))?
            .create_if_missing(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            // Each connection would otherwise open its own empty database
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(MAX_CONNECTIONS)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(store_error)?;

        if !in_memory {
            sqlx::query("PRAGMA journal_mode=WAL")
                .execute(&pool)
                .await
                .map_err(store_error)?;
        }

        let store = Self::from_pool(pool).await?;
        info!("Domain store ready");
        Ok(store)
    }

    /// Wrap an existing pool, running migrations first
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::store(format!("Migration failed: {}", e)))?;
        Ok(Self { pool })
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn store_error(e: sqlx::Error) -> Error {
    Error::store(e.to_string())
}

#[async_trait]
impl DomainStore for SqliteDomainStore {
    async fn insert_domain(&self, record: &DomainRecord) -> Result<()> {
        let result = sqlx::query("INSERT INTO ddns (domain, token, ip, updated) VALUES (?, ?, ?, ?)")
            .bind(&record.domain)
            .bind(&record.token)
            .bind(&record.last_ip)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!("Inserted {}", record.domain);
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::conflict(
                format!("Domain already registered: {}", record.domain),
            )),
            Err(e) => Err(store_error(e)),
        }
    }

    async fn get_domain(&self, domain: &str) -> Result<Option<DomainRecord>> {
        let row = sqlx::query_as::<_, DdnsRow>(
            "SELECT domain, token, ip, updated FROM ddns WHERE domain = ?",
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(DomainRecord::from))
    }

    async fn set_last_ip(&self, domain: &str, ip: &str, updated_at: DateTime<Utc>) -> Result<()> {
        // Single statement: both columns change or neither does
        let result = sqlx::query("UPDATE ddns SET ip = ?, updated = ? WHERE domain = ?")
            .bind(ip)
            .bind(updated_at)
            .bind(domain)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("Domain not registered: {}", domain)));
        }
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<DomainRecord>> {
        let rows = sqlx::query_as::<_, DdnsRow>(
            "SELECT domain, token, ip, updated FROM ddns ORDER BY domain",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(DomainRecord::from).collect())
    }
}
