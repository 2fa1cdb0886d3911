use crate::domain::expense_service::month_or_invalid;
use crate::domain::{calendar, summary};
use crate::errors::Result;
use crate::storage::{ExpenseRepository, IncomeRepository};
use chrono::{Local, NaiveDate, Utc};
use shared::{Expense, ExpenseStatus, Income, MonthlySummary};
use std::collections::HashSet;

/// Builds the monthly view: month transition, overdue sweep, aggregation.
#[derive(Clone)]
pub struct MonthService {
    expenses: ExpenseRepository,
    incomes: IncomeRepository,
}

impl MonthService {
    pub fn new(expenses: ExpenseRepository, incomes: IncomeRepository) -> Self {
        Self { expenses, incomes }
    }

    /// Complete view of a month.
    ///
    /// Navigating to a month first replicates the previous month's records
    /// into it, then flips overdue statuses and persists them, then
    /// aggregates. The sweep uses the server's local date.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        let mes_referencia = month_or_invalid(year, month)?;

        self.generate_month_data(mes_referencia).await?;

        let mut expenses = self.expenses.list_by_month(mes_referencia).await?;
        let incomes = self.incomes.list_by_month(mes_referencia).await?;

        let today = Local::now().date_naive();
        let overdue_ids = summary::detect_overdue(&mut expenses, today);
        if !overdue_ids.is_empty() {
            self.expenses
                .update_statuses(&overdue_ids, ExpenseStatus::Atrasado)
                .await?;
            tracing::info!(
                mes = %mes_referencia,
                count = overdue_ids.len(),
                "expenses marked overdue"
            );
        }

        let totals = summary::aggregate(&expenses, &incomes);
        Ok(MonthlySummary {
            mes_referencia,
            total_despesas: totals.total_despesas,
            total_receitas: totals.total_receitas,
            saldo_livre: totals.saldo_livre,
            total_pago: totals.total_pago,
            total_pendente: totals.total_pendente,
            total_atrasado: totals.total_atrasado,
            expenses,
            incomes,
        })
    }

    /// Replicate the previous month's records into `target_mes`.
    ///
    /// Rules, per record of the previous month:
    /// - a name already present in the target month is skipped;
    /// - an installment with `parcela_atual < parcela_total` is replicated
    ///   as the next installment, `Pendente`, due date shifted into the
    ///   target month (day clamped); the last installment is not replicated;
    /// - a plain expense is replicated only when `recorrente`, as `Pendente`;
    /// - an income is replicated only when `recorrente`, its date shifted.
    ///
    /// Returns true when anything was generated. Safe to call repeatedly;
    /// the name check makes it idempotent per month.
    pub async fn generate_month_data(&self, target_mes: NaiveDate) -> Result<bool> {
        let prev_mes = calendar::previous_month(target_mes);
        let prev_expenses = self.expenses.list_by_month(prev_mes).await?;
        let prev_incomes = self.incomes.list_by_month(prev_mes).await?;

        if prev_expenses.is_empty() && prev_incomes.is_empty() {
            return Ok(false);
        }

        let existing_expense_names: HashSet<String> = self
            .expenses
            .list_by_month(target_mes)
            .await?
            .into_iter()
            .map(|e| e.nome)
            .collect();
        let existing_income_names: HashSet<String> = self
            .incomes
            .list_by_month(target_mes)
            .await?
            .into_iter()
            .map(|i| i.nome)
            .collect();

        let mut generated = false;
        let now = Utc::now();

        for prev in prev_expenses {
            if existing_expense_names.contains(&prev.nome) {
                continue;
            }
            let next_parcela = match (prev.parcela_atual, prev.parcela_total) {
                (Some(atual), Some(total)) => {
                    if atual >= total {
                        // Last installment, the purchase is complete
                        continue;
                    }
                    Some((atual + 1, total))
                }
                _ => {
                    if !prev.recorrente {
                        continue;
                    }
                    None
                }
            };

            let expense = Expense {
                id: uuid::Uuid::new_v4().to_string(),
                mes_referencia: target_mes,
                nome: prev.nome,
                valor: prev.valor,
                vencimento: calendar::shift_to_month(prev.vencimento, target_mes),
                parcela_atual: next_parcela.map(|(atual, _)| atual),
                parcela_total: next_parcela.map(|(_, total)| total),
                recorrente: prev.recorrente,
                status: ExpenseStatus::Pendente,
                created_at: now,
                updated_at: now,
            };
            self.expenses.insert(&expense).await?;
            generated = true;
        }

        for prev in prev_incomes {
            if existing_income_names.contains(&prev.nome) || !prev.recorrente {
                continue;
            }
            let income = Income {
                id: uuid::Uuid::new_v4().to_string(),
                mes_referencia: target_mes,
                nome: prev.nome,
                valor: prev.valor,
                data: prev.data.map(|d| calendar::shift_to_month(d, target_mes)),
                recorrente: true,
                created_at: now,
                updated_at: now,
            };
            self.incomes.insert(&income).await?;
            generated = true;
        }

        if generated {
            tracing::info!(mes = %target_mes, "month data generated from previous month");
        }
        Ok(generated)
    }
}
