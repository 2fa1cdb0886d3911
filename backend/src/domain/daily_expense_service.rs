use crate::domain::categories;
use crate::domain::expense_service::month_or_invalid;
use crate::errors::{Error, Result};
use crate::storage::DailyExpenseRepository;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{
    CreateDailyExpenseRequest, DailyExpense, DailyExpenseDaySummary, DailyExpenseMonthlySummary,
    UpdateDailyExpenseRequest,
};
use std::collections::BTreeMap;

/// CRUD and monthly view over ad-hoc daily expenses.
///
/// `categoria` is always derived from `subcategoria` through the fixed
/// category table; clients never set it directly.
#[derive(Clone)]
pub struct DailyExpenseService {
    repository: DailyExpenseRepository,
}

impl DailyExpenseService {
    pub fn new(repository: DailyExpenseRepository) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        year: i32,
        month: u32,
        request: CreateDailyExpenseRequest,
    ) -> Result<DailyExpense> {
        let mes_referencia = month_or_invalid(year, month)?;
        if request.descricao.trim().is_empty() {
            return Err(Error::Validation("descricao must not be empty".to_string()));
        }
        if request.valor <= Decimal::ZERO {
            return Err(Error::Validation("valor must be positive".to_string()));
        }
        let categoria = resolve_categoria(&request.subcategoria)?;
        validate_metodo(&request.metodo_pagamento)?;

        let now = Utc::now();
        let daily = DailyExpense {
            id: uuid::Uuid::new_v4().to_string(),
            mes_referencia,
            descricao: request.descricao.trim().to_string(),
            valor: request.valor,
            data: request.data,
            categoria: categoria.to_string(),
            subcategoria: request.subcategoria,
            metodo_pagamento: request.metodo_pagamento,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&daily).await?;

        tracing::info!(id = %daily.id, categoria = %daily.categoria, "daily expense created");
        Ok(daily)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateDailyExpenseRequest,
    ) -> Result<DailyExpense> {
        let mut daily = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("daily expense {id} not found")))?;

        if let Some(descricao) = request.descricao {
            if descricao.trim().is_empty() {
                return Err(Error::Validation("descricao must not be empty".to_string()));
            }
            daily.descricao = descricao.trim().to_string();
        }
        if let Some(valor) = request.valor {
            if valor <= Decimal::ZERO {
                return Err(Error::Validation("valor must be positive".to_string()));
            }
            daily.valor = valor;
        }
        if let Some(data) = request.data {
            daily.data = data;
        }
        if let Some(subcategoria) = request.subcategoria {
            // Changing the subcategory re-derives the parent category
            daily.categoria = resolve_categoria(&subcategoria)?.to_string();
            daily.subcategoria = subcategoria;
        }
        if let Some(metodo) = request.metodo_pagamento {
            validate_metodo(&metodo)?;
            daily.metodo_pagamento = metodo;
        }

        daily.updated_at = Utc::now();
        self.repository.update(&daily).await?;
        Ok(daily)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(Error::NotFound(format!("daily expense {id} not found")));
        }
        tracing::info!(%id, "daily expense deleted");
        Ok(())
    }

    /// Monthly view: records grouped by calendar day with per-day subtotals.
    pub async fn monthly_view(&self, year: i32, month: u32) -> Result<DailyExpenseMonthlySummary> {
        let mes_referencia = month_or_invalid(year, month)?;
        let records = self.repository.list_by_month(mes_referencia).await?;

        let mut total_mes = Decimal::ZERO;
        let mut by_day: BTreeMap<chrono::NaiveDate, Vec<DailyExpense>> = BTreeMap::new();
        for record in records {
            total_mes += record.valor;
            by_day.entry(record.data).or_default().push(record);
        }

        let dias = by_day
            .into_iter()
            .map(|(data, gastos)| DailyExpenseDaySummary {
                data,
                subtotal: gastos.iter().map(|g| g.valor).sum(),
                gastos,
            })
            .collect();

        Ok(DailyExpenseMonthlySummary {
            mes_referencia,
            total_mes,
            dias,
        })
    }
}

fn resolve_categoria(subcategoria: &str) -> Result<&'static str> {
    categories::category_for_subcategory(subcategoria)
        .ok_or_else(|| Error::Validation(format!("unknown subcategoria: {subcategoria}")))
}

fn validate_metodo(metodo: &str) -> Result<()> {
    if !categories::is_valid_payment_method(metodo) {
        return Err(Error::Validation(format!(
            "unknown payment method: {metodo}"
        )));
    }
    Ok(())
}
