//! Monthly aggregation: reduce one month's records to their totals.
//!
//! Pure functions over already-fetched record lists. Status is taken as
//! given; the overdue sweep is a separate step that callers run (and
//! persist) before aggregating.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{Expense, ExpenseStatus, Income};

/// Decimal-exact totals of one month.
///
/// `total_pago + total_pendente + total_atrasado` always equals
/// `total_despesas`: every expense carries exactly one status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals {
    pub total_despesas: Decimal,
    pub total_receitas: Decimal,
    pub saldo_livre: Decimal,
    pub total_pago: Decimal,
    pub total_pendente: Decimal,
    pub total_atrasado: Decimal,
}

/// Reduce a month's expenses and incomes to their totals.
///
/// Order is irrelevant and empty inputs yield all zeros. Amounts are summed
/// as-is; this function performs no validation and never reclassifies a
/// status.
pub fn aggregate(expenses: &[Expense], incomes: &[Income]) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();

    for expense in expenses {
        totals.total_despesas += expense.valor;
        match expense.status {
            ExpenseStatus::Pago => totals.total_pago += expense.valor,
            ExpenseStatus::Pendente => totals.total_pendente += expense.valor,
            ExpenseStatus::Atrasado => totals.total_atrasado += expense.valor,
        }
    }

    for income in incomes {
        totals.total_receitas += income.valor;
    }

    totals.saldo_livre = totals.total_receitas - totals.total_despesas;
    totals
}

/// Flip `Pendente` expenses whose due date passed to `Atrasado`, in place.
///
/// Returns the ids of the records that changed so the caller can persist
/// the flip. `today` is a parameter so the sweep itself stays pure; the
/// cutoff is strictly `vencimento < today`.
pub fn detect_overdue(expenses: &mut [Expense], today: NaiveDate) -> Vec<String> {
    let mut changed = Vec::new();
    for expense in expenses.iter_mut() {
        if expense.status == ExpenseStatus::Pendente && expense.vencimento < today {
            expense.status = ExpenseStatus::Atrasado;
            changed.push(expense.id.clone());
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn expense(nome: &str, valor: Decimal, status: ExpenseStatus) -> Expense {
        let now = Utc::now();
        Expense {
            id: format!("exp-{nome}"),
            mes_referencia: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            nome: nome.to_string(),
            valor,
            vencimento: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            parcela_atual: None,
            parcela_total: None,
            recorrente: true,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn income(nome: &str, valor: Decimal) -> Income {
        let now = Utc::now();
        Income {
            id: format!("inc-{nome}"),
            mes_referencia: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            nome: nome.to_string(),
            valor,
            data: None,
            recorrente: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_inputs_yield_zero_totals() {
        let totals = aggregate(&[], &[]);
        assert_eq!(totals, MonthlyTotals::default());
        assert_eq!(totals.saldo_livre, Decimal::ZERO);
    }

    #[test]
    fn test_status_subtotals_partition_total() {
        let expenses = vec![
            expense("Aluguel", dec!(1500.00), ExpenseStatus::Pago),
            expense("Luz", dec!(210.45), ExpenseStatus::Pendente),
            expense("Agua", dec!(89.55), ExpenseStatus::Pendente),
            expense("Cartao", dec!(950.00), ExpenseStatus::Atrasado),
        ];
        let totals = aggregate(&expenses, &[]);

        assert_eq!(totals.total_despesas, dec!(2750.00));
        assert_eq!(totals.total_pago, dec!(1500.00));
        assert_eq!(totals.total_pendente, dec!(300.00));
        assert_eq!(totals.total_atrasado, dec!(950.00));
        assert_eq!(
            totals.total_pago + totals.total_pendente + totals.total_atrasado,
            totals.total_despesas
        );
    }

    #[test]
    fn test_saldo_livre_may_be_negative() {
        let expenses = vec![expense("Aluguel", dec!(2000.00), ExpenseStatus::Pendente)];
        let incomes = vec![income("Salario", dec!(1500.00))];
        let totals = aggregate(&expenses, &incomes);

        assert_eq!(totals.total_receitas, dec!(1500.00));
        assert_eq!(totals.saldo_livre, dec!(-500.00));
    }

    #[test]
    fn test_decimal_sums_do_not_drift() {
        // 0.10 summed ten times must be exactly 1.00
        let expenses: Vec<Expense> = (0..10)
            .map(|i| expense(&format!("e{i}"), dec!(0.10), ExpenseStatus::Pago))
            .collect();
        let totals = aggregate(&expenses, &[]);
        assert_eq!(totals.total_despesas, dec!(1.00));
        assert_eq!(totals.total_pago, dec!(1.00));
    }

    #[test]
    fn test_malformed_amounts_pass_through() {
        // A negative amount is upstream's problem; the sum just includes it.
        let expenses = vec![
            expense("Estorno", dec!(-50.00), ExpenseStatus::Pago),
            expense("Luz", dec!(150.00), ExpenseStatus::Pago),
        ];
        let totals = aggregate(&expenses, &[]);
        assert_eq!(totals.total_despesas, dec!(100.00));
        assert_eq!(totals.total_pago, dec!(100.00));
    }

    #[test]
    fn test_detect_overdue_flips_only_past_due_pendente() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let mut expenses = vec![
            expense("Vencida", dec!(100.00), ExpenseStatus::Pendente),
            expense("Futura", dec!(100.00), ExpenseStatus::Pendente),
            expense("Paga", dec!(100.00), ExpenseStatus::Pago),
        ];
        expenses[0].vencimento = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        expenses[1].vencimento = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        expenses[2].vencimento = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let changed = detect_overdue(&mut expenses, today);

        assert_eq!(changed, vec!["exp-Vencida".to_string()]);
        assert_eq!(expenses[0].status, ExpenseStatus::Atrasado);
        assert_eq!(expenses[1].status, ExpenseStatus::Pendente);
        // Paid stays paid even when past due
        assert_eq!(expenses[2].status, ExpenseStatus::Pago);
    }

    #[test]
    fn test_detect_overdue_due_today_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let mut expenses = vec![expense("Hoje", dec!(80.00), ExpenseStatus::Pendente)];
        expenses[0].vencimento = today;

        let changed = detect_overdue(&mut expenses, today);
        assert!(changed.is_empty());
        assert_eq!(expenses[0].status, ExpenseStatus::Pendente);
    }
}
