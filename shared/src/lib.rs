use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Payment status of a fixed monthly expense.
///
/// The status is assigned by the backend (new records start as `Pendente`,
/// the overdue sweep flips `Pendente` to `Atrasado`); the aggregation code
/// always takes it as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseStatus {
    Pendente,
    Pago,
    Atrasado,
}

impl ExpenseStatus {
    /// Wire/storage representation ("Pendente", "Pago", "Atrasado").
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pendente => "Pendente",
            ExpenseStatus::Pago => "Pago",
            ExpenseStatus::Atrasado => "Atrasado",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpenseStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendente" => Ok(ExpenseStatus::Pendente),
            "Pago" => Ok(ExpenseStatus::Pago),
            "Atrasado" => Ok(ExpenseStatus::Atrasado),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Error returned when a stored status string is not a known variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown expense status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

/// A fixed monthly expense (rent, subscription, installment of a purchase).
///
/// `mes_referencia` is always the first day of the month the record belongs
/// to. `parcela_atual`/`parcela_total` are both present for installment
/// purchases and both absent otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub mes_referencia: NaiveDate,
    pub nome: String,
    pub valor: Decimal,
    pub vencimento: NaiveDate,
    pub parcela_atual: Option<u32>,
    pub parcela_total: Option<u32>,
    pub recorrente: bool,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// True when the record carries a complete installment pair.
    pub fn is_installment(&self) -> bool {
        self.parcela_atual.is_some() && self.parcela_total.is_some()
    }

    /// Grouping key for installment purchases: `(nome, parcela_total)`.
    ///
    /// `None` for records that are not installment purchases. The name-based
    /// key is a deliberate heuristic carried over from the data model: one
    /// purchase produces N records sharing a name and a total count.
    pub fn installment_key(&self) -> Option<(&str, u32)> {
        match (self.parcela_atual, self.parcela_total) {
            (Some(_), Some(total)) => Some((self.nome.as_str(), total)),
            _ => None,
        }
    }
}

/// A monthly income (salary, recurring transfer, one-off receipt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub mes_referencia: NaiveDate,
    pub nome: String,
    pub valor: Decimal,
    pub data: Option<NaiveDate>,
    pub recorrente: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ad-hoc daily expense, categorized by a fixed category table.
///
/// `categoria` is derived server-side from `subcategoria`; clients never
/// supply it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpense {
    pub id: String,
    pub mes_referencia: NaiveDate,
    pub descricao: String,
    pub valor: Decimal,
    pub data: NaiveDate,
    pub categoria: String,
    pub subcategoria: String,
    pub metodo_pagamento: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_recorrente() -> bool {
    true
}

/// Payload for creating an expense. The reference month comes from the URL
/// and the status always starts as `Pendente`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub nome: String,
    pub valor: Decimal,
    pub vencimento: NaiveDate,
    #[serde(default)]
    pub parcela_atual: Option<u32>,
    #[serde(default)]
    pub parcela_total: Option<u32>,
    #[serde(default = "default_recorrente")]
    pub recorrente: bool,
}

/// Partial update for an expense. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub nome: Option<String>,
    pub valor: Option<Decimal>,
    pub vencimento: Option<NaiveDate>,
    pub parcela_atual: Option<u32>,
    pub parcela_total: Option<u32>,
    pub recorrente: Option<bool>,
    pub status: Option<ExpenseStatus>,
}

/// Payload for creating an income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIncomeRequest {
    pub nome: String,
    pub valor: Decimal,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default = "default_recorrente")]
    pub recorrente: bool,
}

/// Partial update for an income. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateIncomeRequest {
    pub nome: Option<String>,
    pub valor: Option<Decimal>,
    pub data: Option<NaiveDate>,
    pub recorrente: Option<bool>,
}

/// Payload for creating a daily expense. `categoria` is derived from
/// `subcategoria` by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDailyExpenseRequest {
    pub descricao: String,
    pub valor: Decimal,
    pub data: NaiveDate,
    pub subcategoria: String,
    pub metodo_pagamento: String,
}

/// Partial update for a daily expense. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDailyExpenseRequest {
    pub descricao: Option<String>,
    pub valor: Option<Decimal>,
    pub data: Option<NaiveDate>,
    pub subcategoria: Option<String>,
    pub metodo_pagamento: Option<String>,
}

/// Complete monthly view: totals plus the records they were computed from.
///
/// `total_pago + total_pendente + total_atrasado == total_despesas` always
/// holds: every expense has exactly one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub mes_referencia: NaiveDate,
    pub total_despesas: Decimal,
    pub total_receitas: Decimal,
    pub saldo_livre: Decimal,
    pub total_pago: Decimal,
    pub total_pendente: Decimal,
    pub total_atrasado: Decimal,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
}

/// One logical installment purchase, reconstructed from the records that
/// share its `(nome, parcela_total)` key.
///
/// `valor_total_compra` is the observed total: the sum over the member
/// records actually present in the dataset, which may be fewer than
/// `parcela_total` when some installments have not been generated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentGroup {
    pub nome: String,
    pub parcela_total: u32,
    pub status_geral: ExpenseStatus,
    pub valor_total_compra: Decimal,
    pub valor_pago: Decimal,
    pub valor_restante: Decimal,
    pub installments: Vec<Expense>,
}

/// Consolidated view of all installment purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentsResponse {
    pub groups: Vec<InstallmentGroup>,
    pub total_gasto: Decimal,
    pub total_pago: Decimal,
    pub total_pendente: Decimal,
    pub total_atrasado: Decimal,
}

/// Daily expenses of a single calendar day, with their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenseDaySummary {
    pub data: NaiveDate,
    pub subtotal: Decimal,
    pub gastos: Vec<DailyExpense>,
}

/// Monthly view of daily expenses, grouped by day in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenseMonthlySummary {
    pub mes_referencia: NaiveDate,
    pub total_mes: Decimal,
    pub dias: Vec<DailyExpenseDaySummary>,
}

/// Fixed category table and payment methods for daily expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categorias: BTreeMap<String, Vec<String>>,
    pub metodos_pagamento: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_expense() -> Expense {
        Expense {
            id: "e1".to_string(),
            mes_referencia: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            nome: "Notebook".to_string(),
            valor: dec!(1000.00),
            vencimento: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            parcela_atual: Some(1),
            parcela_total: Some(3),
            recorrente: false,
            status: ExpenseStatus::Pendente,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            ExpenseStatus::Pendente,
            ExpenseStatus::Pago,
            ExpenseStatus::Atrasado,
        ] {
            let parsed: ExpenseStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("Cancelado".parse::<ExpenseStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_as_wire_string() {
        let json = serde_json::to_string(&ExpenseStatus::Atrasado).unwrap();
        assert_eq!(json, "\"Atrasado\"");
        let back: ExpenseStatus = serde_json::from_str("\"Pago\"").unwrap();
        assert_eq!(back, ExpenseStatus::Pago);
    }

    #[test]
    fn test_installment_key_requires_both_fields() {
        let mut expense = sample_expense();
        assert_eq!(expense.installment_key(), Some(("Notebook", 3)));
        assert!(expense.is_installment());

        expense.parcela_atual = None;
        assert_eq!(expense.installment_key(), None);
        assert!(!expense.is_installment());

        expense.parcela_atual = Some(1);
        expense.parcela_total = None;
        assert_eq!(expense.installment_key(), None);
    }

    #[test]
    fn test_expense_amount_serializes_as_number() {
        let expense = sample_expense();
        let value = serde_json::to_value(&expense).unwrap();
        assert!(value["valor"].is_number());
        assert_eq!(value["vencimento"], "2026-01-15");
        assert_eq!(value["status"], "Pendente");
    }

    #[test]
    fn test_create_expense_request_defaults() {
        let request: CreateExpenseRequest = serde_json::from_str(
            r#"{"nome":"Aluguel","valor":1500.0,"vencimento":"2026-02-05"}"#,
        )
        .unwrap();
        assert!(request.recorrente);
        assert_eq!(request.parcela_atual, None);
        assert_eq!(request.parcela_total, None);
    }
}
