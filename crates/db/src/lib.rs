//! SQLite store for Libris: pool construction, schema bootstrap and transactions.

use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite, Transaction,
};

pub mod error;

pub use error::DbError;
pub use sqlx::Error as SqlxError;

/// Connection settings for the relational store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseSettings::default_create_if_missing")]
    pub create_if_missing: bool,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "sqlite://library.db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }

    fn default_create_if_missing() -> bool {
        true
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
            create_if_missing: Self::default_create_if_missing(),
        }
    }
}

/// A block of idempotent DDL contributed by a module.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub id: &'static str,
    pub ddl: &'static str,
}

/// Shared handle to the store. Cloning is cheap; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool against `settings.url` with foreign-key enforcement on.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(settings.create_if_missing)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(
            target: "libris-db",
            url = %settings.url,
            max_connections = settings.max_connections,
            "database pool established"
        );

        Ok(Self { pool })
    }

    /// Private in-memory database held on a single connection that never expires.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, DbError> {
        Ok(self.pool.begin().await?)
    }

    /// Apply every schema block in order inside one transaction.
    pub async fn bootstrap(&self, schemas: &[(String, TableSchema)]) -> Result<(), DbError> {
        let mut tx = self.begin().await?;

        for (module, schema) in schemas {
            tracing::info!(target: "libris-db", module = %module, schema = schema.id, "applying schema");
            sqlx::raw_sql(schema.ddl).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "libris-db", "database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: TableSchema = TableSchema {
        id: "001_parent",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS parent (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL UNIQUE CHECK (label <> '')
            );
            "#,
    };

    const CHILD: TableSchema = TableSchema {
        id: "001_child",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS child (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER NOT NULL REFERENCES parent(id)
            );
            "#,
    };

    async fn open() -> Database {
        let db = Database::in_memory().await.unwrap();
        let schemas = vec![
            ("parent".to_string(), PARENT),
            ("child".to_string(), CHILD),
        ];
        db.bootstrap(&schemas).await.unwrap();
        db
    }

    #[test]
    fn default_url_points_at_local_file() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.url, "sqlite://library.db");
        assert!(settings.create_if_missing);
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let db = open().await;
        let schemas = vec![("parent".to_string(), PARENT)];
        db.bootstrap(&schemas).await.unwrap();
    }

    #[tokio::test]
    async fn unique_violation_is_classified() {
        let db = open().await;
        sqlx::query("INSERT INTO parent (label) VALUES ('a')")
            .execute(db.pool())
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO parent (label) VALUES ('a')")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn foreign_key_violation_is_classified() {
        let db = open().await;
        let err = sqlx::query("INSERT INTO child (parent_id) VALUES (42)")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn check_violation_is_classified() {
        let db = open().await;
        let err = sqlx::query("INSERT INTO parent (label) VALUES ('')")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::CheckViolation(_)));
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_rows() {
        let db = open().await;
        let mut tx = db.begin().await.unwrap();
        sqlx::query("INSERT INTO parent (label) VALUES ('b')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parent")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
