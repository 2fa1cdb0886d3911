use crate::db::DbConnection;
use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::DailyExpense;
use sqlx::{sqlite::SqliteRow, Row};
use std::str::FromStr;

/// Repository for ad-hoc daily expenses.
#[derive(Clone)]
pub struct DailyExpenseRepository {
    db: DbConnection,
}

impl DailyExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All daily expenses of a month, ordered by day then insertion time.
    pub async fn list_by_month(&self, mes_referencia: NaiveDate) -> Result<Vec<DailyExpense>> {
        let rows = sqlx::query(
            "SELECT * FROM daily_expenses WHERE mes_referencia = ? ORDER BY data, created_at",
        )
        .bind(mes_referencia)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_daily_expense).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<DailyExpense>> {
        let row = sqlx::query("SELECT * FROM daily_expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_daily_expense).transpose()
    }

    pub async fn insert(&self, daily: &DailyExpense) -> Result<()> {
        sqlx::query(
            "INSERT INTO daily_expenses \
             (id, mes_referencia, descricao, valor, data, categoria, subcategoria, \
              metodo_pagamento, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&daily.id)
        .bind(daily.mes_referencia)
        .bind(&daily.descricao)
        .bind(daily.valor.to_string())
        .bind(daily.data)
        .bind(&daily.categoria)
        .bind(&daily.subcategoria)
        .bind(&daily.metodo_pagamento)
        .bind(daily.created_at)
        .bind(daily.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    pub async fn update(&self, daily: &DailyExpense) -> Result<()> {
        let result = sqlx::query(
            "UPDATE daily_expenses SET mes_referencia = ?, descricao = ?, valor = ?, data = ?, \
             categoria = ?, subcategoria = ?, metodo_pagamento = ?, updated_at = ? WHERE id = ?",
        )
        .bind(daily.mes_referencia)
        .bind(&daily.descricao)
        .bind(daily.valor.to_string())
        .bind(daily.data)
        .bind(&daily.categoria)
        .bind(&daily.subcategoria)
        .bind(&daily.metodo_pagamento)
        .bind(daily.updated_at)
        .bind(&daily.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "daily expense {} not found",
                daily.id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM daily_expenses WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_daily_expense(row: &SqliteRow) -> Result<DailyExpense> {
    let valor: String = row.get("valor");

    Ok(DailyExpense {
        id: row.get("id"),
        mes_referencia: row.get("mes_referencia"),
        descricao: row.get("descricao"),
        valor: Decimal::from_str(&valor)?,
        data: row.get::<NaiveDate, _>("data"),
        categoria: row.get("categoria"),
        subcategoria: row.get("subcategoria"),
        metodo_pagamento: row.get("metodo_pagamento"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rust_decimal_macros::dec;

    fn make_daily(descricao: &str, data: NaiveDate) -> DailyExpense {
        let now = Utc::now();
        DailyExpense {
            id: uuid::Uuid::new_v4().to_string(),
            mes_referencia: NaiveDate::from_ymd_opt(data.year(), data.month(), 1).unwrap(),
            descricao: descricao.to_string(),
            valor: dec!(42.90),
            data,
            categoria: "Alimentação".to_string(),
            subcategoria: "Restaurante".to_string(),
            metodo_pagamento: "Pix".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn setup() -> DailyExpenseRepository {
        let db = DbConnection::init_test().await.expect("create test db");
        DailyExpenseRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_list_ordered_by_day() {
        let repo = setup().await;
        let day_10 = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let day_03 = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();

        repo.insert(&make_daily("Almoco", day_10)).await.unwrap();
        repo.insert(&make_daily("Mercado", day_03)).await.unwrap();

        let january = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let list = repo.list_by_month(january).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].descricao, "Mercado");
        assert_eq!(list[1].descricao, "Almoco");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        let mut daily = make_daily("Cafe", day);
        repo.insert(&daily).await.unwrap();

        daily.valor = dec!(15.00);
        daily.subcategoria = "Café".to_string();
        repo.update(&daily).await.unwrap();

        let stored = repo.get(&daily.id).await.unwrap().unwrap();
        assert_eq!(stored.valor, dec!(15.00));
        assert_eq!(stored.subcategoria, "Café");

        assert!(repo.delete(&daily.id).await.unwrap());
        assert!(repo.get(&daily.id).await.unwrap().is_none());
    }
}
