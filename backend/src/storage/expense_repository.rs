use crate::db::DbConnection;
use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{Expense, ExpenseStatus};
use sqlx::{sqlite::SqliteRow, Row};
use std::str::FromStr;

/// Repository for fixed monthly expenses.
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DbConnection,
}

impl ExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All expenses of a month, ordered by due date.
    pub async fn list_by_month(&self, mes_referencia: NaiveDate) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            "SELECT * FROM expenses WHERE mes_referencia = ? ORDER BY vencimento, nome",
        )
        .bind(mes_referencia)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_expense).collect()
    }

    /// All installment-bearing expenses across every month.
    ///
    /// Records missing either half of the installment pair are not
    /// installment purchases and are excluded here already.
    pub async fn list_installments(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            "SELECT * FROM expenses \
             WHERE parcela_atual IS NOT NULL AND parcela_total IS NOT NULL \
             ORDER BY nome, parcela_total, parcela_atual",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_expense).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_expense).transpose()
    }

    pub async fn insert(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            "INSERT INTO expenses \
             (id, mes_referencia, nome, valor, vencimento, parcela_atual, parcela_total, \
              recorrente, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&expense.id)
        .bind(expense.mes_referencia)
        .bind(&expense.nome)
        .bind(expense.valor.to_string())
        .bind(expense.vencimento)
        .bind(expense.parcela_atual.map(|v| v as i64))
        .bind(expense.parcela_total.map(|v| v as i64))
        .bind(expense.recorrente)
        .bind(expense.status.as_str())
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    pub async fn update(&self, expense: &Expense) -> Result<()> {
        let result = sqlx::query(
            "UPDATE expenses SET mes_referencia = ?, nome = ?, valor = ?, vencimento = ?, \
             parcela_atual = ?, parcela_total = ?, recorrente = ?, status = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(expense.mes_referencia)
        .bind(&expense.nome)
        .bind(expense.valor.to_string())
        .bind(expense.vencimento)
        .bind(expense.parcela_atual.map(|v| v as i64))
        .bind(expense.parcela_total.map(|v| v as i64))
        .bind(expense.recorrente)
        .bind(expense.status.as_str())
        .bind(expense.updated_at)
        .bind(&expense.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("expense {} not found", expense.id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the status of every listed expense, bumping `updated_at`.
    pub async fn update_statuses(
        &self,
        ids: &[String],
        status: ExpenseStatus,
    ) -> Result<usize> {
        let now = Utc::now();
        let mut affected = 0;
        for id in ids {
            affected += sqlx::query(
                "UPDATE expenses SET status = ?, updated_at = ? WHERE id = ?",
            )
            .bind(status.as_str())
            .bind(now)
            .bind(id)
            .execute(self.db.pool())
            .await?
            .rows_affected() as usize;
        }
        Ok(affected)
    }
}

fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
    let valor: String = row.get("valor");
    let status: String = row.get("status");

    Ok(Expense {
        id: row.get("id"),
        mes_referencia: row.get("mes_referencia"),
        nome: row.get("nome"),
        valor: Decimal::from_str(&valor)?,
        vencimento: row.get("vencimento"),
        parcela_atual: row.get::<Option<i64>, _>("parcela_atual").map(|v| v as u32),
        parcela_total: row.get::<Option<i64>, _>("parcela_total").map(|v| v as u32),
        recorrente: row.get("recorrente"),
        status: status.parse()?,
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}
