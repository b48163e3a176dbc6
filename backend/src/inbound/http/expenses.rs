//! Expense and profit handlers. Restricted to admins and accountants.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::ExpenseListing;
use crate::domain::{
    ApiResult, Error, Expense, ExpenseInput, ExpensePeriod, NewExpense, ProfitAnalysis, SearchTerm,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /expenses`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseListParams {
    /// Defaults to `current_year`.
    #[param(inline)]
    pub period: Option<ExpensePeriod>,
    pub search: Option<String>,
}

/// Expenses in a period with totals per category.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(ExpenseListParams),
    responses(
        (status = 200, description = "Expenses", body = ExpenseListing),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Finance role required", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ExpenseListParams>,
) -> ApiResult<web::Json<ExpenseListing>> {
    session.require_finance()?;
    let period = params.period.unwrap_or_default();
    let search = SearchTerm::new(params.search.as_deref());
    Ok(web::Json(state.expenses_query.list(period, search).await?))
}

/// Record an expense.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = ExpenseInput,
    responses(
        (status = 201, description = "Expense recorded", body = Expense),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Finance role required", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "recordExpense"
)]
#[post("/expenses")]
pub async fn record_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExpenseInput>,
) -> ApiResult<HttpResponse> {
    let staff = session.require_finance()?;
    let expense = NewExpense::try_from(payload.into_inner())?;
    let recorded = state.expenses.record(expense, staff.staff_id).await?;
    Ok(HttpResponse::Created().json(recorded))
}

/// Current against previous calendar year.
#[utoipa::path(
    get,
    path = "/api/v1/expenses/profit-analysis",
    responses(
        (status = 200, description = "Profit analysis", body = ProfitAnalysis),
        (status = 403, description = "Finance role required", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "profitAnalysis"
)]
#[get("/expenses/profit-analysis")]
pub async fn profit_analysis(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfitAnalysis>> {
    session.require_finance()?;
    Ok(web::Json(state.expenses_query.profit_analysis().await?))
}
