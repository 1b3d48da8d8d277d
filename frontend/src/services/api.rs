use gloo::net::http::Request;
use shared::{
    CreateExpenseRequest, DeleteExpenseResponse, ErrorBody, Expense, UpdateExpenseRequest,
};

/// API client for communicating with the backend server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Fetch expenses, optionally filtered by category ("all" means no filter)
    pub async fn list_expenses(&self, category: &str) -> Result<Vec<Expense>, String> {
        let url = if category == "all" {
            format!("{}/api/expenses", self.base_url)
        } else {
            format!("{}/api/expenses?category={}", self.base_url, category)
        };

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<Vec<Expense>>()
                        .await
                        .map_err(|e| format!("Failed to parse expenses: {}", e))
                } else {
                    Err(Self::error_message(response).await)
                }
            }
            Err(e) => Err(format!("Failed to fetch expenses: {}", e)),
        }
    }

    /// Create a new expense
    pub async fn create_expense(&self, request: CreateExpenseRequest) -> Result<Expense, String> {
        let url = format!("{}/api/expenses", self.base_url);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<Expense>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(Self::error_message(response).await)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Update any subset of an expense's fields
    pub async fn update_expense(
        &self,
        id: i64,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, String> {
        let url = format!("{}/api/expenses/{}", self.base_url, id);

        match Request::put(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<Expense>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(Self::error_message(response).await)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Delete an expense by id
    pub async fn delete_expense(&self, id: i64) -> Result<DeleteExpenseResponse, String> {
        let url = format!("{}/api/expenses/{}", self.base_url, id);

        match Request::delete(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<DeleteExpenseResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(Self::error_message(response).await)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    // Failure responses carry {"error": "..."}; fall back to raw text if not
    async fn error_message(response: gloo::net::http::Response) -> String {
        if let Ok(body) = response.json::<ErrorBody>().await {
            body.error
        } else {
            format!("Server error ({})", response.status())
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
