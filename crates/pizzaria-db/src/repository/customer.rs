//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Deletion Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  delete(customer)                                                   │
//! │       │                                                             │
//! │       ├── any order in open/preparing/ready?                        │
//! │       │        └── YES → refuse (CustomerHasOpenOrders)             │
//! │       │                                                             │
//! │       └── NO → delete row; delivered/cancelled history cascades     │
//! │                with it (FK ON DELETE CASCADE)                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! Live orders never vanish as a side effect of cleaning up a customer.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pizzaria_core::validation::validate_customer_fields;
use pizzaria_core::{CoreError, Customer};

/// Input for creating or updating a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub postal_code: String,
    pub address: String,
    pub complement: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    postal_code: String,
    address: String,
    complement: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            postal_code: row.postal_code,
            address: row.address,
            complement: row.complement,
            created_at: row.created_at,
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer after validating its fields.
    pub async fn insert(&self, input: CustomerInput) -> DbResult<Customer> {
        validate_customer_fields(
            &input.name,
            &input.phone,
            &input.postal_code,
            &input.address,
            input.complement.as_deref(),
        )
        .map_err(CoreError::from)?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        debug!(customer_id = %id, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, postal_code, address, complement, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .bind(input.postal_code.trim())
        .bind(input.address.trim())
        .bind(input.complement.as_deref().map(str::trim))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    /// Fetches a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, postal_code, address, complement, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))?;

        Ok(row.into())
    }

    /// Lists all customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, postal_code, address, complement, created_at
            FROM customers
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Updates a customer's fields.
    pub async fn update(&self, id: &str, input: CustomerInput) -> DbResult<Customer> {
        validate_customer_fields(
            &input.name,
            &input.phone,
            &input.postal_code,
            &input.address,
            input.complement.as_deref(),
        )
        .map_err(CoreError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?2, phone = ?3, postal_code = ?4, address = ?5, complement = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .bind(input.postal_code.trim())
        .bind(input.address.trim())
        .bind(input.complement.as_deref().map(str::trim))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.get_by_id(id).await
    }

    /// Deletes a customer.
    ///
    /// Refused while the customer has any order still in progress;
    /// terminal-order history cascades away with the row.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        // Check and delete run in one transaction so an order created on
        // another connection cannot slip in between them.
        let mut tx = self.pool.begin().await?;

        let open_orders: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE customer_id = ?1
              AND status IN ('open', 'preparing', 'ready')
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open_orders > 0 {
            return Err(DbError::CustomerHasOpenOrders {
                id: id.to_string(),
                open_orders,
            });
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        tx.commit().await?;

        debug!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn maria() -> CustomerInput {
        CustomerInput {
            name: "Maria Silva".into(),
            phone: "11 99999-0000".into(),
            postal_code: "01310-100".into(),
            address: "Av. Paulista, 1000".into(),
            complement: Some("apto 42".into()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let created = db.customers().insert(maria()).await.unwrap();

        let fetched = db.customers().get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Maria Silva");
        assert_eq!(fetched.complement.as_deref(), Some("apto 42"));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let db = test_db().await;
        let mut input = maria();
        input.name = "   ".into();

        let err = db.customers().insert(input).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        let mut z = maria();
        z.name = "Zeca".into();
        db.customers().insert(z).await.unwrap();

        let mut a = maria();
        a.name = "Ana".into();
        db.customers().insert(a).await.unwrap();

        let names: Vec<_> = db
            .customers()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zeca"]);
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let created = db.customers().insert(maria()).await.unwrap();

        let mut input = maria();
        input.phone = "11 98888-7777".into();
        let updated = db.customers().update(&created.id, input).await.unwrap();
        assert_eq!(updated.phone, "11 98888-7777");
    }

    #[tokio::test]
    async fn test_delete_missing_customer() {
        let db = test_db().await;
        let err = db.customers().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_without_orders_succeeds() {
        let db = test_db().await;
        let created = db.customers().insert(maria()).await.unwrap();

        db.customers().delete(&created.id).await.unwrap();
        let err = db.customers().get_by_id(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
