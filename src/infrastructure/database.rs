// Database - SQLite connection pool and schema bootstrap for pages, sections and assets

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid database url '{}': {}", config.url, e))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to database at {}", config.url);
        Ok(Self { pool })
    }

    /// A private in-memory database. The pool holds exactly one connection that is
    /// never recycled, since every new SQLite memory connection starts empty.
    pub async fn connect_in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            AppError::ConfigurationError(format!("Invalid in-memory database url: {}", e))
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL,
                parent_id INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create pages table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sections (
                id INTEGER PRIMARY KEY,
                page_id INTEGER NOT NULL,
                section_type TEXT NOT NULL,
                content TEXT NOT NULL,
                position INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create sections table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS assets (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                asset_type TEXT NOT NULL,
                filename TEXT NOT NULL,
                uploaded_at TEXT NOT NULL,
                uploaded_by TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create assets table: {}", e)))?;

        // Root pages share the parent key 0, which no snowflake id can take
        let indexes = [
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_pages_parent_slug ON pages(COALESCE(parent_id, 0), slug)",
            "CREATE INDEX IF NOT EXISTS idx_pages_parent ON pages(parent_id)",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_sections_page_position ON sections(page_id, position)",
            "CREATE INDEX IF NOT EXISTS idx_assets_type ON assets(asset_type)",
        ];
        for statement in indexes {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }
}
