use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier, never reused after deletion
    pub id: i64,
    /// Expense amount, always > 0
    pub amount: f64,
    /// Description with surrounding whitespace already trimmed
    pub description: String,
    pub category: Category,
    /// Creation timestamp (RFC 3339, UTC), assigned by the store
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// The fixed set of expense categories.
///
/// This is the single definition consumed by both backend validation and the
/// frontend's select options, so the two can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Other,
}

impl Category {
    /// Every valid category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    /// Parse a category name. Matching is exact; anything outside the fixed
    /// set is rejected.
    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for POST /api/expenses.
///
/// Every field is optional at the wire level so that a missing field surfaces
/// as a validation error with the standard error body, not as a bare
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    /// Category name, validated against [`Category`] by the service
    pub category: Option<String>,
}

/// Body for PUT /api/expenses/:id. Omitted fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Body for a successful DELETE /api/expenses/:id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub message: String,
}

/// Error body shape shared by every failure response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
