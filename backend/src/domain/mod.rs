//! Domain logic: pure aggregation/grouping plus the services that
//! orchestrate it over the repositories.

pub mod calendar;
pub mod categories;
pub mod daily_expense_service;
pub mod expense_service;
pub mod income_service;
pub mod installments;
pub mod month_service;
pub mod summary;

pub use daily_expense_service::DailyExpenseService;
pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use month_service::MonthService;
