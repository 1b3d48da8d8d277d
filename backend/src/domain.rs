use crate::db::ExpenseStore;
use shared::{Category, CreateExpenseRequest, Expense, UpdateExpenseRequest};
use thiserror::Error;
use tracing::info;

/// Everything that can go wrong handling an expense request.
///
/// Validation failures carry the user-facing message; store failures keep the
/// cause for logging but never leak it to the caller.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Expense not found")]
    NotFound,
    #[error("Internal server error")]
    Store(#[from] anyhow::Error),
}

impl ExpenseError {
    fn invalid(message: &str) -> Self {
        ExpenseError::InvalidInput(message.to_string())
    }
}

/// Stateless request logic: validates input, talks to the store, and maps
/// outcomes to the error taxonomy. All validation runs before any store call.
#[derive(Clone)]
pub struct ExpenseService {
    store: ExpenseStore,
}

impl ExpenseService {
    pub fn new(store: ExpenseStore) -> Self {
        Self { store }
    }

    /// List expenses, newest first, optionally narrowed by category name.
    ///
    /// The filter is deliberately loose: a missing value, the sentinel "all",
    /// or a name outside the fixed set all mean "no filter". This mirrors the
    /// behavior the UI has always relied on.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Expense>, ExpenseError> {
        let category = filter
            .filter(|value| *value != "all")
            .and_then(Category::parse);

        Ok(self.store.list(category).await?)
    }

    /// Create an expense from user input. All three fields are required.
    pub async fn create(&self, request: CreateExpenseRequest) -> Result<Expense, ExpenseError> {
        let (Some(amount), Some(description), Some(category)) =
            (request.amount, request.description, request.category)
        else {
            return Err(ExpenseError::invalid("Missing required fields"));
        };

        let amount = validate_amount(amount)?;
        let description = validate_description(&description)?;
        let category = validate_category(&category)?;

        let expense = self.store.create(amount, &description, category).await?;
        info!("Created expense {} ({})", expense.id, expense.category);
        Ok(expense)
    }

    /// Apply a partial update. Provided fields are validated with the create
    /// rules; omitted fields are left unchanged.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ExpenseError> {
        let id = parse_id(id)?;

        let amount = request.amount.map(validate_amount).transpose()?;
        let description = request
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        let category = request
            .category
            .as_deref()
            .map(validate_category)
            .transpose()?;

        let updated = self
            .store
            .update(id, amount, description.as_deref(), category)
            .await?
            .ok_or(ExpenseError::NotFound)?;

        info!("Updated expense {}", updated.id);
        Ok(updated)
    }

    /// Delete an expense by id.
    pub async fn delete(&self, id: &str) -> Result<(), ExpenseError> {
        let id = parse_id(id)?;

        if self.store.delete(id).await? {
            info!("Deleted expense {}", id);
            Ok(())
        } else {
            Err(ExpenseError::NotFound)
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, ExpenseError> {
    raw.parse()
        .map_err(|_| ExpenseError::invalid("Invalid expense ID"))
}

fn validate_amount(amount: f64) -> Result<f64, ExpenseError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ExpenseError::invalid("Amount must be greater than 0"))
    }
}

fn validate_description(description: &str) -> Result<String, ExpenseError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        Err(ExpenseError::invalid("Description cannot be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn validate_category(category: &str) -> Result<Category, ExpenseError> {
    Category::parse(category).ok_or_else(|| ExpenseError::invalid("Invalid category"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_service() -> ExpenseService {
        let store = ExpenseStore::init_test()
            .await
            .expect("Failed to create test database");
        ExpenseService::new(store)
    }

    fn create_request(amount: f64, description: &str, category: &str) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount: Some(amount),
            description: Some(description.to_string()),
            category: Some(category.to_string()),
        }
    }

    fn assert_invalid(result: Result<Expense, ExpenseError>, expected_message: &str) {
        match result {
            Err(ExpenseError::InvalidInput(message)) => assert_eq!(message, expected_message),
            other => panic!("expected InvalidInput, got {:?}", other.map(|e| e.id)),
        }
    }

    #[tokio::test]
    async fn test_create_valid_expense_is_listable() {
        let service = create_test_service().await;

        let created = service
            .create(create_request(14.2, "  Groceries  ", "Food"))
            .await
            .unwrap();

        // Invariants from the data model
        assert!(created.amount > 0.0);
        assert_eq!(created.description, "Groceries"); // trimmed before persisting
        assert_eq!(created.category, Category::Food);

        let listed = service.list(None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let service = create_test_service().await;

        let request = CreateExpenseRequest {
            amount: Some(10.0),
            description: None,
            category: Some("Food".to_string()),
        };
        assert_invalid(service.create(request).await, "Missing required fields");

        // Nothing should have been written
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amounts() {
        let service = create_test_service().await;

        assert_invalid(
            service.create(create_request(-5.0, "Lunch", "Food")).await,
            "Amount must be greater than 0",
        );
        assert_invalid(
            service.create(create_request(0.0, "Lunch", "Food")).await,
            "Amount must be greater than 0",
        );
        assert_invalid(
            service
                .create(create_request(f64::NAN, "Lunch", "Food"))
                .await,
            "Amount must be greater than 0",
        );
    }

    #[tokio::test]
    async fn test_create_rejects_blank_description() {
        let service = create_test_service().await;

        assert_invalid(
            service.create(create_request(5.0, "   ", "Food")).await,
            "Description cannot be empty",
        );
    }

    #[tokio::test]
    async fn test_create_rejects_category_outside_fixed_set() {
        let service = create_test_service().await;

        assert_invalid(
            service
                .create(create_request(5.0, "Flights", "Vacation"))
                .await,
            "Invalid category",
        );
    }

    #[tokio::test]
    async fn test_update_changes_only_provided_fields() {
        let service = create_test_service().await;

        let created = service
            .create(create_request(8.0, "Taxi", "Other"))
            .await
            .unwrap();

        let request = UpdateExpenseRequest {
            amount: None,
            description: None,
            category: Some("Transport".to_string()),
        };
        let updated = service
            .update(&created.id.to_string(), request)
            .await
            .unwrap();

        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.category, Category::Transport);
    }

    #[tokio::test]
    async fn test_update_validates_provided_fields() {
        let service = create_test_service().await;

        let created = service
            .create(create_request(8.0, "Taxi", "Transport"))
            .await
            .unwrap();
        let id = created.id.to_string();

        let bad_amount = UpdateExpenseRequest {
            amount: Some(-1.0),
            description: None,
            category: None,
        };
        assert_invalid(
            service.update(&id, bad_amount).await,
            "Amount must be greater than 0",
        );

        let bad_category = UpdateExpenseRequest {
            amount: None,
            description: None,
            category: Some("Vacation".to_string()),
        };
        assert_invalid(service.update(&id, bad_category).await, "Invalid category");

        // Failed updates must not have touched the record
        let listed = service.list(None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_update_nonexistent_id_is_not_found() {
        let service = create_test_service().await;

        let request = UpdateExpenseRequest {
            amount: Some(5.0),
            description: None,
            category: None,
        };
        let result = service.update("999999", request).await;
        assert!(matches!(result, Err(ExpenseError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_rejects_non_integer_id() {
        let service = create_test_service().await;

        let request = UpdateExpenseRequest {
            amount: Some(5.0),
            description: None,
            category: None,
        };
        assert_invalid(service.update("abc", request).await, "Invalid expense ID");
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found_the_second_time() {
        let service = create_test_service().await;

        let created = service
            .create(create_request(3.5, "Snack", "Food"))
            .await
            .unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.expect("First delete should succeed");

        let second = service.delete(&id).await;
        assert!(matches!(second, Err(ExpenseError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_integer_id() {
        let service = create_test_service().await;

        let result = service.delete("not-a-number").await;
        match result {
            Err(ExpenseError::InvalidInput(message)) => {
                assert_eq!(message, "Invalid expense ID")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_filter_matches_exactly_one_category() {
        let service = create_test_service().await;

        service
            .create(create_request(12.0, "Groceries", "Food"))
            .await
            .unwrap();
        service
            .create(create_request(4.5, "Metro", "Transport"))
            .await
            .unwrap();

        let food = service.list(Some("Food")).await.unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].category, Category::Food);
    }

    #[tokio::test]
    async fn test_list_treats_all_and_unrecognized_filters_as_no_filter() {
        let service = create_test_service().await;

        service
            .create(create_request(12.0, "Groceries", "Food"))
            .await
            .unwrap();
        service
            .create(create_request(4.5, "Metro", "Transport"))
            .await
            .unwrap();

        assert_eq!(service.list(Some("all")).await.unwrap().len(), 2);
        assert_eq!(service.list(Some("Vacation")).await.unwrap().len(), 2);
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }
}
