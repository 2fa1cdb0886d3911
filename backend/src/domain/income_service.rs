use crate::domain::expense_service::month_or_invalid;
use crate::errors::{Error, Result};
use crate::storage::IncomeRepository;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{CreateIncomeRequest, Income, UpdateIncomeRequest};

/// CRUD over monthly incomes.
#[derive(Clone)]
pub struct IncomeService {
    repository: IncomeRepository,
}

impl IncomeService {
    pub fn new(repository: IncomeRepository) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        year: i32,
        month: u32,
        request: CreateIncomeRequest,
    ) -> Result<Income> {
        let mes_referencia = month_or_invalid(year, month)?;
        if request.nome.trim().is_empty() {
            return Err(Error::Validation("nome must not be empty".to_string()));
        }
        if request.valor <= Decimal::ZERO {
            return Err(Error::Validation("valor must be positive".to_string()));
        }

        let now = Utc::now();
        let income = Income {
            id: uuid::Uuid::new_v4().to_string(),
            mes_referencia,
            nome: request.nome.trim().to_string(),
            valor: request.valor,
            data: request.data,
            recorrente: request.recorrente,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&income).await?;

        tracing::info!(id = %income.id, nome = %income.nome, "income created");
        Ok(income)
    }

    pub async fn update(&self, id: &str, request: UpdateIncomeRequest) -> Result<Income> {
        let mut income = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("income {id} not found")))?;

        if let Some(nome) = request.nome {
            if nome.trim().is_empty() {
                return Err(Error::Validation("nome must not be empty".to_string()));
            }
            income.nome = nome.trim().to_string();
        }
        if let Some(valor) = request.valor {
            if valor <= Decimal::ZERO {
                return Err(Error::Validation("valor must be positive".to_string()));
            }
            income.valor = valor;
        }
        if let Some(data) = request.data {
            income.data = Some(data);
        }
        if let Some(recorrente) = request.recorrente {
            income.recorrente = recorrente;
        }

        income.updated_at = Utc::now();
        self.repository.update(&income).await?;
        Ok(income)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(Error::NotFound(format!("income {id} not found")));
        }
        tracing::info!(%id, "income deleted");
        Ok(())
    }
}
