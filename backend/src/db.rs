use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use shared::{Category, Expense};
use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

/// ExpenseStore owns durability and identifier assignment for expense records.
///
/// Cheap to clone; all clones share one pool. The pool is opened once at
/// startup and closed on shutdown.
#[derive(Clone)]
pub struct ExpenseStore {
    pool: Arc<SqlitePool>,
}

impl ExpenseStore {
    /// Open (creating if necessary) the database at `url` and set up the schema.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open a test database with a unique in-memory name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // AUTOINCREMENT keeps deleted ids from ever being reassigned
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Close the underlying pool. Called once on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// List expenses, newest first. `filter` narrows to a single category.
    pub async fn list(&self, filter: Option<Category>) -> Result<Vec<Expense>> {
        let rows = match filter {
            Some(category) => {
                sqlx::query(
                    "SELECT id, amount, description, category, created_at \
                     FROM expenses WHERE category = ? \
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(category.as_str())
                .fetch_all(&*self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, amount, description, category, created_at \
                     FROM expenses ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(&*self.pool)
                .await?
            }
        };

        rows.iter().map(decode_expense).collect()
    }

    /// Fetch a single expense by id.
    pub async fn get(&self, id: i64) -> Result<Option<Expense>> {
        let row = sqlx::query(
            "SELECT id, amount, description, category, created_at FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(decode_expense(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new expense. The store assigns `id` and `created_at`.
    pub async fn create(
        &self,
        amount: f64,
        description: &str,
        category: Category,
    ) -> Result<Expense> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let result = sqlx::query(
            "INSERT INTO expenses (amount, description, category, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(amount)
        .bind(description)
        .bind(category.as_str())
        .bind(&created_at)
        .execute(&*self.pool)
        .await?;

        Ok(Expense {
            id: result.last_insert_rowid(),
            amount,
            description: description.to_string(),
            category,
            created_at,
        })
    }

    /// Apply a partial update, writing only the provided columns.
    /// Returns `None` when no record with `id` exists.
    pub async fn update(
        &self,
        id: i64,
        amount: Option<f64>,
        description: Option<&str>,
        category: Option<Category>,
    ) -> Result<Option<Expense>> {
        let result = sqlx::query(
            "UPDATE expenses SET \
             amount = COALESCE(?, amount), \
             description = COALESCE(?, description), \
             category = COALESCE(?, category) \
             WHERE id = ?",
        )
        .bind(amount)
        .bind(description)
        .bind(category.map(|c| c.as_str()))
        .bind(id)
        .execute(&*self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete an expense by id. Returns `false` when no record existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn decode_expense(row: &SqliteRow) -> Result<Expense> {
    let category: String = row.get("category");
    let category = Category::parse(&category)
        .ok_or_else(|| anyhow!("unknown category in store: {}", category))?;

    Ok(Expense {
        id: row.get("id"),
        amount: row.get("amount"),
        description: row.get("description"),
        category,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> ExpenseStore {
        ExpenseStore::init_test()
            .await
            .expect("Failed to create test database")
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = setup_test().await;

        let created = store
            .create(9.5, "Bus ticket", Category::Transport)
            .await
            .expect("Failed to create expense");

        assert!(created.id > 0);
        assert_eq!(created.amount, 9.5);
        assert_eq!(created.description, "Bus ticket");
        assert_eq!(created.category, Category::Transport);
        assert!(!created.created_at.is_empty());

        let all = store.list(None).await.expect("Failed to list expenses");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], created);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = setup_test().await;

        let first = store.create(1.0, "first", Category::Other).await.unwrap();
        let second = store.create(2.0, "second", Category::Other).await.unwrap();
        let third = store.create(3.0, "third", Category::Other).await.unwrap();

        let all = store.list(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();

        // Timestamps may collide within a test run; the id tie-break keeps
        // insertion order stable either way.
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let store = setup_test().await;

        store.create(12.0, "Groceries", Category::Food).await.unwrap();
        store.create(4.5, "Metro", Category::Transport).await.unwrap();
        store.create(30.0, "Dinner", Category::Food).await.unwrap();

        let food = store.list(Some(Category::Food)).await.unwrap();
        assert_eq!(food.len(), 2);
        assert!(food.iter().all(|e| e.category == Category::Food));

        let shopping = store.list(Some(Category::Shopping)).await.unwrap();
        assert!(shopping.is_empty());
    }

    #[tokio::test]
    async fn test_update_writes_only_provided_fields() {
        let store = setup_test().await;

        let created = store.create(20.0, "Sneakers", Category::Shopping).await.unwrap();

        let updated = store
            .update(created.id, None, None, Some(Category::Other))
            .await
            .expect("Failed to update expense")
            .expect("Expense should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.category, Category::Other);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_returns_none() {
        let store = setup_test().await;

        let result = store.update(999_999, Some(5.0), None, None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let store = setup_test().await;

        let created = store.create(3.0, "Coffee", Category::Food).await.unwrap();

        let deleted = store.delete(created.id).await.expect("Failed to delete");
        assert!(deleted);

        assert!(store.get(created.id).await.unwrap().is_none());

        let deleted_again = store.delete(created.id).await.unwrap();
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused_after_delete() {
        let store = setup_test().await;

        store.create(1.0, "keep", Category::Other).await.unwrap();
        let doomed = store.create(2.0, "doomed", Category::Other).await.unwrap();

        store.delete(doomed.id).await.unwrap();

        let next = store.create(3.0, "next", Category::Other).await.unwrap();
        assert!(next.id > doomed.id);
    }
}
