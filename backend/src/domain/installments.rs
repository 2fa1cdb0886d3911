//! Installment grouping: reconstruct logical purchases from the monthly
//! records that share a `(nome, parcela_total)` key.

use rust_decimal::Decimal;
use shared::{Expense, ExpenseStatus, InstallmentGroup, InstallmentsResponse};
use std::collections::BTreeMap;

/// Group installment-bearing expenses into purchases.
///
/// Records without a complete installment pair are ignored. Groups come out
/// ordered by key and their members by `parcela_atual`; totals are the
/// observed sums over the records actually present, so a purchase whose
/// future installments have not been generated yet reports only what exists.
///
/// The group status is `Atrasado` if any member is, `Pago` if every member
/// is, and `Pendente` otherwise.
pub fn group_installments(expenses: Vec<Expense>) -> InstallmentsResponse {
    let mut by_key: BTreeMap<(String, u32), Vec<Expense>> = BTreeMap::new();
    for expense in expenses {
        if let Some((nome, total)) = expense.installment_key() {
            by_key
                .entry((nome.to_string(), total))
                .or_default()
                .push(expense);
        }
    }

    let mut groups = Vec::with_capacity(by_key.len());
    let mut total_gasto = Decimal::ZERO;
    let mut total_pago = Decimal::ZERO;
    let mut total_pendente = Decimal::ZERO;
    let mut total_atrasado = Decimal::ZERO;

    for ((nome, parcela_total), mut members) in by_key {
        members.sort_by_key(|e| e.parcela_atual);

        let mut valor_total_compra = Decimal::ZERO;
        let mut valor_pago = Decimal::ZERO;
        let mut any_atrasado = false;
        let mut all_pago = true;

        for member in &members {
            valor_total_compra += member.valor;
            total_gasto += member.valor;
            match member.status {
                ExpenseStatus::Pago => {
                    valor_pago += member.valor;
                    total_pago += member.valor;
                }
                ExpenseStatus::Pendente => {
                    all_pago = false;
                    total_pendente += member.valor;
                }
                ExpenseStatus::Atrasado => {
                    all_pago = false;
                    any_atrasado = true;
                    total_atrasado += member.valor;
                }
            }
        }

        let status_geral = if any_atrasado {
            ExpenseStatus::Atrasado
        } else if all_pago {
            ExpenseStatus::Pago
        } else {
            ExpenseStatus::Pendente
        };

        groups.push(InstallmentGroup {
            nome,
            parcela_total,
            status_geral,
            valor_restante: valor_total_compra - valor_pago,
            valor_total_compra,
            valor_pago,
            installments: members,
        });
    }

    InstallmentsResponse {
        groups,
        total_gasto,
        total_pago,
        total_pendente,
        total_atrasado,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn installment(
        nome: &str,
        atual: u32,
        total: u32,
        valor: Decimal,
        status: ExpenseStatus,
    ) -> Expense {
        let now = Utc::now();
        Expense {
            id: format!("{nome}-{atual}"),
            mes_referencia: NaiveDate::from_ymd_opt(2026, atual.min(12), 1).unwrap(),
            nome: nome.to_string(),
            valor,
            vencimento: NaiveDate::from_ymd_opt(2026, atual.min(12), 10).unwrap(),
            parcela_atual: Some(atual),
            parcela_total: Some(total),
            recorrente: false,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn plain(nome: &str) -> Expense {
        let mut e = installment(nome, 1, 1, dec!(100.00), ExpenseStatus::Pendente);
        e.parcela_atual = None;
        e.parcela_total = None;
        e
    }

    #[test]
    fn test_empty_input_yields_empty_response() {
        let response = group_installments(Vec::new());
        assert!(response.groups.is_empty());
        assert_eq!(response.total_gasto, Decimal::ZERO);
    }

    #[test]
    fn test_groups_by_name_and_total_count() {
        // Two purchases named "TV" with different installment counts stay apart.
        let expenses = vec![
            installment("TV", 1, 10, dec!(200.00), ExpenseStatus::Pago),
            installment("TV", 2, 10, dec!(200.00), ExpenseStatus::Pendente),
            installment("TV", 1, 3, dec!(500.00), ExpenseStatus::Pago),
        ];
        let response = group_installments(expenses);

        assert_eq!(response.groups.len(), 2);
        assert_eq!(response.groups[0].parcela_total, 3);
        assert_eq!(response.groups[1].parcela_total, 10);
        assert_eq!(response.groups[1].installments.len(), 2);
    }

    #[test]
    fn test_members_sorted_by_parcela_atual() {
        let expenses = vec![
            installment("Sofa", 3, 5, dec!(300.00), ExpenseStatus::Pendente),
            installment("Sofa", 1, 5, dec!(300.00), ExpenseStatus::Pago),
            installment("Sofa", 2, 5, dec!(300.00), ExpenseStatus::Pago),
        ];
        let response = group_installments(expenses);

        let members = &response.groups[0].installments;
        assert_eq!(
            members.iter().map(|e| e.parcela_atual).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn test_group_totals_and_status() {
        // A 10x TV of 200 each where only 3 records exist yet: the observed
        // total is 600, not 2000.
        let expenses = vec![
            installment("TV", 1, 10, dec!(200.00), ExpenseStatus::Pago),
            installment("TV", 2, 10, dec!(200.00), ExpenseStatus::Pago),
            installment("TV", 3, 10, dec!(200.00), ExpenseStatus::Pendente),
        ];
        let response = group_installments(expenses);

        let group = &response.groups[0];
        assert_eq!(group.valor_total_compra, dec!(600.00));
        assert_eq!(group.valor_pago, dec!(400.00));
        assert_eq!(group.valor_restante, dec!(200.00));
        assert_eq!(group.status_geral, ExpenseStatus::Pendente);

        assert_eq!(response.total_gasto, dec!(600.00));
        assert_eq!(response.total_pago, dec!(400.00));
        assert_eq!(response.total_pendente, dec!(200.00));
        assert_eq!(response.total_atrasado, Decimal::ZERO);
    }

    #[test]
    fn test_status_precedence_atrasado_wins() {
        let expenses = vec![
            installment("Geladeira", 1, 2, dec!(800.00), ExpenseStatus::Pago),
            installment("Geladeira", 2, 2, dec!(800.00), ExpenseStatus::Atrasado),
        ];
        let response = group_installments(expenses);
        assert_eq!(response.groups[0].status_geral, ExpenseStatus::Atrasado);
        assert_eq!(response.total_atrasado, dec!(800.00));
    }

    #[test]
    fn test_all_paid_group_is_pago() {
        let expenses = vec![
            installment("Celular", 1, 2, dec!(600.00), ExpenseStatus::Pago),
            installment("Celular", 2, 2, dec!(600.00), ExpenseStatus::Pago),
        ];
        let response = group_installments(expenses);

        let group = &response.groups[0];
        assert_eq!(group.status_geral, ExpenseStatus::Pago);
        assert_eq!(group.valor_restante, Decimal::ZERO);
    }

    #[test]
    fn test_plain_expenses_are_ignored() {
        let expenses = vec![
            plain("Aluguel"),
            installment("TV", 1, 10, dec!(200.00), ExpenseStatus::Pendente),
        ];
        let response = group_installments(expenses);
        assert_eq!(response.groups.len(), 1);
        assert_eq!(response.groups[0].nome, "TV");
        assert_eq!(response.total_gasto, dec!(200.00));
    }
}
