use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::{
    categories, DailyExpenseService, ExpenseService, IncomeService, MonthService,
};
use crate::errors::Result;
use crate::storage::{DailyExpenseRepository, ExpenseRepository, IncomeRepository};
use shared::{
    CategoriesResponse, CreateDailyExpenseRequest, CreateExpenseRequest, CreateIncomeRequest,
    DailyExpense, DailyExpenseMonthlySummary, Expense, Income, InstallmentsResponse,
    MonthlySummary, UpdateDailyExpenseRequest, UpdateExpenseRequest, UpdateIncomeRequest,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub months: MonthService,
    pub expenses: ExpenseService,
    pub incomes: IncomeService,
    pub daily_expenses: DailyExpenseService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        let expense_repo = ExpenseRepository::new(db.clone());
        let income_repo = IncomeRepository::new(db.clone());
        let daily_repo = DailyExpenseRepository::new(db);

        Self {
            months: MonthService::new(expense_repo.clone(), income_repo.clone()),
            expenses: ExpenseService::new(expense_repo),
            incomes: IncomeService::new(income_repo),
            daily_expenses: DailyExpenseService::new(daily_repo),
        }
    }
}

/// Build the full API router.
///
/// Creation endpoints live under the month they belong to; record-level
/// endpoints address records by id.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/months/:year/:month", get(monthly_summary))
        .route("/months/:year/:month/expenses", post(create_expense))
        .route("/months/:year/:month/incomes", post(create_income))
        .route(
            "/months/:year/:month/daily-expenses",
            get(daily_expenses_monthly).post(create_daily_expense),
        )
        .route("/expenses/installments", get(installments))
        .route("/expenses/:id/duplicate", post(duplicate_expense))
        .route("/expenses/:id", patch(update_expense).delete(delete_expense))
        .route("/incomes/:id", patch(update_income).delete(delete_income))
        .route("/daily-expenses/categories", get(get_categories))
        .route(
            "/daily-expenses/:id",
            patch(update_daily_expense).delete(delete_daily_expense),
        );

    Router::new().nest("/api", api).with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn monthly_summary(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthlySummary>> {
    info!("GET /api/months/{}/{}", year, month);
    let summary = state.months.monthly_summary(year, month).await?;
    Ok(Json(summary))
}

async fn create_expense(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>)> {
    info!("POST /api/months/{}/{}/expenses - {}", year, month, request.nome);
    let expense = state.expenses.create(year, month, request).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>> {
    info!("PATCH /api/expenses/{}", id);
    let expense = state.expenses.update(&id, request).await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/expenses/{}", id);
    state.expenses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Expense>)> {
    info!("POST /api/expenses/{}/duplicate", id);
    let copy = state.expenses.duplicate(&id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

async fn installments(State(state): State<AppState>) -> Result<Json<InstallmentsResponse>> {
    info!("GET /api/expenses/installments");
    let response = state.expenses.installments().await?;
    Ok(Json(response))
}

async fn create_income(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<Income>)> {
    info!("POST /api/months/{}/{}/incomes - {}", year, month, request.nome);
    let income = state.incomes.create(year, month, request).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

async fn update_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateIncomeRequest>,
) -> Result<Json<Income>> {
    info!("PATCH /api/incomes/{}", id);
    let income = state.incomes.update(&id, request).await?;
    Ok(Json(income))
}

async fn delete_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/incomes/{}", id);
    state.incomes.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn daily_expenses_monthly(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<DailyExpenseMonthlySummary>> {
    info!("GET /api/months/{}/{}/daily-expenses", year, month);
    let view = state.daily_expenses.monthly_view(year, month).await?;
    Ok(Json(view))
}

async fn create_daily_expense(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<CreateDailyExpenseRequest>,
) -> Result<(StatusCode, Json<DailyExpense>)> {
    info!("POST /api/months/{}/{}/daily-expenses", year, month);
    let daily = state.daily_expenses.create(year, month, request).await?;
    Ok((StatusCode::CREATED, Json(daily)))
}

async fn update_daily_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDailyExpenseRequest>,
) -> Result<Json<DailyExpense>> {
    info!("PATCH /api/daily-expenses/{}", id);
    let daily = state.daily_expenses.update(&id, request).await?;
    Ok(Json(daily))
}

async fn delete_daily_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/daily-expenses/{}", id);
    state.daily_expenses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_categories() -> Json<CategoriesResponse> {
    Json(categories::categories_response())
}
