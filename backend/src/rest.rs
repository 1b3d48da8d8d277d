use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use shared::{CreateExpenseRequest, DeleteExpenseResponse, ErrorBody, Expense, UpdateExpenseRequest};
use tracing::info;

use crate::domain::{ExpenseError, ExpenseService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ExpenseService,
}

impl AppState {
    pub fn new(service: ExpenseService) -> Self {
        Self { service }
    }
}

/// Routes for the expense API; the server nests these under /api.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExpenseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ExpenseError::NotFound => StatusCode::NOT_FOUND,
            ExpenseError::Store(cause) => {
                // The cause stays in the log; the caller gets the stable message
                tracing::error!("Store failure: {:?}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Query parameters for the expense list endpoint
#[derive(Deserialize, Debug)]
pub struct ExpenseListQuery {
    pub category: Option<String>,
}

/// Axum handler for GET /api/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<Expense>>, ExpenseError> {
    info!("GET /api/expenses - category: {:?}", query.category);

    let expenses = state.service.list(query.category.as_deref()).await?;
    Ok(Json(expenses))
}

/// Axum handler for POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ExpenseError> {
    let Json(request) = body.map_err(invalid_body)?;
    info!("POST /api/expenses - request: {:?}", request);

    let expense = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Axum handler for PUT /api/expenses/:id
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, ExpenseError> {
    let Json(request) = body.map_err(invalid_body)?;
    info!("PUT /api/expenses/{} - request: {:?}", id, request);

    let expense = state.service.update(&id, request).await?;
    Ok(Json(expense))
}

/// Axum handler for DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteExpenseResponse>, ExpenseError> {
    info!("DELETE /api/expenses/{}", id);

    state.service.delete(&id).await?;
    Ok(Json(DeleteExpenseResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}

// A body that fails to deserialize (wrong type for amount, invalid JSON) is a
// validation failure like any other, so it keeps the {error} body and a 400
// instead of axum's default rejection.
fn invalid_body(rejection: JsonRejection) -> ExpenseError {
    info!("Rejected request body: {}", rejection.body_text());
    ExpenseError::InvalidInput("Invalid request body".to_string())
}
