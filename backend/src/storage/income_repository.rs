use crate::db::DbConnection;
use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::Income;
use sqlx::{sqlite::SqliteRow, Row};
use std::str::FromStr;

/// Repository for monthly incomes.
#[derive(Clone)]
pub struct IncomeRepository {
    db: DbConnection,
}

impl IncomeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All incomes of a month, ordered by receipt date (dateless first).
    pub async fn list_by_month(&self, mes_referencia: NaiveDate) -> Result<Vec<Income>> {
        let rows =
            sqlx::query("SELECT * FROM incomes WHERE mes_referencia = ? ORDER BY data, nome")
                .bind(mes_referencia)
                .fetch_all(self.db.pool())
                .await?;

        rows.iter().map(row_to_income).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<Income>> {
        let row = sqlx::query("SELECT * FROM incomes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_income).transpose()
    }

    pub async fn insert(&self, income: &Income) -> Result<()> {
        sqlx::query(
            "INSERT INTO incomes \
             (id, mes_referencia, nome, valor, data, recorrente, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&income.id)
        .bind(income.mes_referencia)
        .bind(&income.nome)
        .bind(income.valor.to_string())
        .bind(income.data)
        .bind(income.recorrente)
        .bind(income.created_at)
        .bind(income.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    pub async fn update(&self, income: &Income) -> Result<()> {
        let result = sqlx::query(
            "UPDATE incomes SET mes_referencia = ?, nome = ?, valor = ?, data = ?, \
             recorrente = ?, updated_at = ? WHERE id = ?",
        )
        .bind(income.mes_referencia)
        .bind(&income.nome)
        .bind(income.valor.to_string())
        .bind(income.data)
        .bind(income.recorrente)
        .bind(income.updated_at)
        .bind(&income.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("income {} not found", income.id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_income(row: &SqliteRow) -> Result<Income> {
    let valor: String = row.get("valor");

    Ok(Income {
        id: row.get("id"),
        mes_referencia: row.get("mes_referencia"),
        nome: row.get("nome"),
        valor: Decimal::from_str(&valor)?,
        data: row.get::<Option<NaiveDate>, _>("data"),
        recorrente: row.get("recorrente"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}
