//! SQLite repositories, one per entity.

mod daily_expense_repository;
mod expense_repository;
mod income_repository;

pub use daily_expense_repository::DailyExpenseRepository;
pub use expense_repository::ExpenseRepository;
pub use income_repository::IncomeRepository;
