use crate::domain::{calendar, installments};
use crate::errors::{Error, Result};
use crate::storage::ExpenseRepository;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CreateExpenseRequest, Expense, ExpenseStatus, InstallmentsResponse, UpdateExpenseRequest,
};

/// CRUD and installment views over fixed monthly expenses.
#[derive(Clone)]
pub struct ExpenseService {
    repository: ExpenseRepository,
}

impl ExpenseService {
    pub fn new(repository: ExpenseRepository) -> Self {
        Self { repository }
    }

    /// Create an expense in the given month. New records always start as
    /// `Pendente`.
    pub async fn create(
        &self,
        year: i32,
        month: u32,
        request: CreateExpenseRequest,
    ) -> Result<Expense> {
        let mes_referencia = month_or_invalid(year, month)?;
        validate_nome(&request.nome)?;
        validate_valor(request.valor)?;
        validate_parcelas(request.parcela_atual, request.parcela_total)?;

        let now = Utc::now();
        let expense = Expense {
            id: uuid::Uuid::new_v4().to_string(),
            mes_referencia,
            nome: request.nome.trim().to_string(),
            valor: request.valor,
            vencimento: request.vencimento,
            parcela_atual: request.parcela_atual,
            parcela_total: request.parcela_total,
            recorrente: request.recorrente,
            status: ExpenseStatus::Pendente,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&expense).await?;

        tracing::info!(id = %expense.id, nome = %expense.nome, "expense created");
        Ok(expense)
    }

    /// Apply a partial update. Absent fields are left unchanged; the
    /// installment pair must stay consistent after the merge.
    pub async fn update(&self, id: &str, request: UpdateExpenseRequest) -> Result<Expense> {
        let mut expense = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("expense {id} not found")))?;

        if let Some(nome) = request.nome {
            validate_nome(&nome)?;
            expense.nome = nome.trim().to_string();
        }
        if let Some(valor) = request.valor {
            validate_valor(valor)?;
            expense.valor = valor;
        }
        if let Some(vencimento) = request.vencimento {
            expense.vencimento = vencimento;
        }
        if let Some(atual) = request.parcela_atual {
            expense.parcela_atual = Some(atual);
        }
        if let Some(total) = request.parcela_total {
            expense.parcela_total = Some(total);
        }
        if let Some(recorrente) = request.recorrente {
            expense.recorrente = recorrente;
        }
        if let Some(status) = request.status {
            expense.status = status;
        }
        validate_parcelas(expense.parcela_atual, expense.parcela_total)?;

        expense.updated_at = Utc::now();
        self.repository.update(&expense).await?;
        Ok(expense)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(Error::NotFound(format!("expense {id} not found")));
        }
        tracing::info!(%id, "expense deleted");
        Ok(())
    }

    /// Clone an existing expense into its own month as a fresh `Pendente`
    /// record.
    pub async fn duplicate(&self, id: &str) -> Result<Expense> {
        let original = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("expense {id} not found")))?;

        let now = Utc::now();
        let copy = Expense {
            id: uuid::Uuid::new_v4().to_string(),
            status: ExpenseStatus::Pendente,
            created_at: now,
            updated_at: now,
            ..original
        };
        self.repository.insert(&copy).await?;

        tracing::info!(source = %id, id = %copy.id, "expense duplicated");
        Ok(copy)
    }

    /// All installment purchases across every month, grouped.
    pub async fn installments(&self) -> Result<InstallmentsResponse> {
        let records = self.repository.list_installments().await?;
        Ok(installments::group_installments(records))
    }
}

pub(crate) fn month_or_invalid(year: i32, month: u32) -> Result<NaiveDate> {
    calendar::month_start(year, month)
        .ok_or_else(|| Error::Validation(format!("invalid month: {year}-{month:02}")))
}

fn validate_nome(nome: &str) -> Result<()> {
    if nome.trim().is_empty() {
        return Err(Error::Validation("nome must not be empty".to_string()));
    }
    Ok(())
}

fn validate_valor(valor: Decimal) -> Result<()> {
    if valor <= Decimal::ZERO {
        return Err(Error::Validation("valor must be positive".to_string()));
    }
    Ok(())
}

fn validate_parcelas(atual: Option<u32>, total: Option<u32>) -> Result<()> {
    match (atual, total) {
        (None, None) => Ok(()),
        (Some(atual), Some(total)) => {
            if atual < 1 || total < 1 {
                return Err(Error::Validation(
                    "installment numbers start at 1".to_string(),
                ));
            }
            if atual > total {
                return Err(Error::Validation(format!(
                    "parcela_atual {atual} exceeds parcela_total {total}"
                )));
            }
            Ok(())
        }
        _ => Err(Error::Validation(
            "parcela_atual and parcela_total must be set together".to_string(),
        )),
    }
}
