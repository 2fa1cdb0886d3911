use crate::errors::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// Default database URL, overridable via MEU_CONTROLE_DB
const DATABASE_URL: &str = "sqlite:meu_controle.db";

/// DbConnection owns the SQLite pool shared by all repositories.
///
/// Money columns are stored as TEXT and parsed to `Decimal` at the row
/// boundary; dates are ISO-8601 TEXT, timestamps RFC 3339 TEXT.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the file and schema if
    /// they do not exist yet.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database.
    pub async fn init() -> Result<Self> {
        let url =
            std::env::var("MEU_CONTROLE_DB").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a uniquely named in-memory database for tests.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                mes_referencia TEXT NOT NULL,
                nome TEXT NOT NULL,
                valor TEXT NOT NULL,
                vencimento TEXT NOT NULL,
                parcela_atual INTEGER,
                parcela_total INTEGER,
                recorrente BOOLEAN NOT NULL DEFAULT 1,
                status TEXT NOT NULL DEFAULT 'Pendente',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_expenses_mes_referencia ON expenses(mes_referencia)",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS incomes (
                id TEXT PRIMARY KEY,
                mes_referencia TEXT NOT NULL,
                nome TEXT NOT NULL,
                valor TEXT NOT NULL,
                data TEXT,
                recorrente BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_incomes_mes_referencia ON incomes(mes_referencia)",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_expenses (
                id TEXT PRIMARY KEY,
                mes_referencia TEXT NOT NULL,
                descricao TEXT NOT NULL,
                valor TEXT NOT NULL,
                data TEXT NOT NULL,
                categoria TEXT NOT NULL,
                subcategoria TEXT NOT NULL,
                metodo_pagamento TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_daily_expenses_mes_referencia ON daily_expenses(mes_referencia)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
