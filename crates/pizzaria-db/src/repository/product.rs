//! # Product Repository
//!
//! Database operations for menu products.
//!
//! ## Deletion Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  delete(product) — one transaction                                  │
//! │                                                                     │
//! │  Non-terminal orders (open/preparing/ready):                        │
//! │    • line items for the product are removed                         │
//! │    • its crust/extra prices are subtracted from affected units      │
//! │    • line totals, subtotal and total are recomputed                 │
//! │      (delivery fee unchanged: the address didn't move)              │
//! │                                                                     │
//! │  Terminal orders (delivered/cancelled):                             │
//! │    • snapshots stay byte-for-byte; product_id set NULL by FK        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pizzaria_core::validation::validate_product_name;
use pizzaria_core::{CatalogSnapshot, CoreError, Product, ProductCategory, ProductPricing};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: ProductCategory,
    price_cents: Option<i64>,
    price_p_cents: Option<i64>,
    price_m_cents: Option<i64>,
    price_g_cents: Option<i64>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    /// Reassembles the category/pricing pairing guarded by the CHECK
    /// constraint. A row that defeats the constraint (hand-edited
    /// database) surfaces as CorruptRow instead of a panic.
    fn into_product(self) -> DbResult<Product> {
        let pricing = match (
            self.category,
            self.price_cents,
            self.price_p_cents,
            self.price_m_cents,
            self.price_g_cents,
        ) {
            (ProductCategory::Pizza, None, Some(p), Some(m), Some(g)) => ProductPricing::Sized {
                p_cents: p,
                m_cents: m,
                g_cents: g,
            },
            (c, Some(price), None, None, None) if c != ProductCategory::Pizza => {
                ProductPricing::Flat { price_cents: price }
            }
            _ => {
                return Err(DbError::CorruptRow {
                    entity: "Product".to_string(),
                    id: self.id,
                    reason: "category/pricing column pairing violated".to_string(),
                })
            }
        };

        Ok(Product {
            id: self.id,
            name: self.name,
            category: self.category,
            pricing,
            created_at: self.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, name, category, price_cents, \
     price_p_cents, price_m_cents, price_g_cents, created_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// The category/pricing pairing is validated in the core before the
    /// row ever reaches the CHECK constraint.
    pub async fn insert(
        &self,
        name: &str,
        category: ProductCategory,
        pricing: ProductPricing,
    ) -> DbResult<Product> {
        validate_product_name(name).map_err(CoreError::from)?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let product = Product {
            id: id.clone(),
            name: name.trim().to_string(),
            category,
            pricing,
            created_at,
        };
        product.validate().map_err(CoreError::from)?;

        let (flat, p, m, g) = match &product.pricing {
            ProductPricing::Flat { price_cents } => (Some(*price_cents), None, None, None),
            ProductPricing::Sized {
                p_cents,
                m_cents,
                g_cents,
            } => (None, Some(*p_cents), Some(*m_cents), Some(*g_cents)),
        };

        debug!(product_id = %id, category = %category.as_str(), "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, category, price_cents,
                 price_p_cents, price_m_cents, price_g_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(flat)
        .bind(p)
        .bind(m)
        .bind(g)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        row.into_product()
    }

    /// Lists products, optionally filtered by category, ordered by name.
    pub async fn list(&self, category: Option<ProductCategory>) -> DbResult<Vec<Product>> {
        let rows = match category {
            Some(cat) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE category = ?1 ORDER BY name COLLATE NOCASE"
                ))
                .bind(cat)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Materializes the whole catalog for the pricing engine.
    pub async fn catalog_snapshot(&self) -> DbResult<CatalogSnapshot> {
        let products = self.list(None).await?;
        Ok(CatalogSnapshot::new(products))
    }

    /// Deletes a product, adjusting non-terminal orders in one transaction.
    ///
    /// See the module docs for the full semantics. Terminal orders are
    /// never touched; their FK references are nulled by `ON DELETE SET
    /// NULL` when the product row goes away.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Product", id));
        }

        // 1. Drop the product's own line items from live orders
        //    (their extras cascade with them).
        sqlx::query(
            r#"
            DELETE FROM order_items
            WHERE product_id = ?1
              AND order_id IN (
                  SELECT id FROM orders
                  WHERE status IN ('open', 'preparing', 'ready'))
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // 2. Strip it as a crust from live line items.
        sqlx::query(
            r#"
            UPDATE order_items
            SET unit_price_cents = unit_price_cents - crust_price_cents,
                crust_product_id = NULL,
                crust_name = NULL,
                crust_price_cents = NULL
            WHERE crust_product_id = ?1
              AND order_id IN (
                  SELECT id FROM orders
                  WHERE status IN ('open', 'preparing', 'ready'))
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // 3. Strip it as an extra: subtract its price from each affected
        //    unit, then remove the extra rows.
        sqlx::query(
            r#"
            UPDATE order_items
            SET unit_price_cents = unit_price_cents - (
                SELECT COALESCE(SUM(e.price_cents), 0)
                FROM order_item_extras e
                WHERE e.order_item_id = order_items.id
                  AND e.product_id = ?1)
            WHERE id IN (
                SELECT order_item_id FROM order_item_extras WHERE product_id = ?1)
              AND order_id IN (
                  SELECT id FROM orders
                  WHERE status IN ('open', 'preparing', 'ready'))
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM order_item_extras
            WHERE product_id = ?1
              AND order_item_id IN (
                  SELECT i.id FROM order_items i
                  JOIN orders o ON o.id = i.order_id
                  WHERE o.status IN ('open', 'preparing', 'ready'))
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // 4. Recompute stored totals for live orders. The delivery fee is
        //    left alone: it depends on the address, not the cart.
        sqlx::query(
            r#"
            UPDATE order_items
            SET line_total_cents = unit_price_cents * quantity
            WHERE order_id IN (
                SELECT id FROM orders
                WHERE status IN ('open', 'preparing', 'ready'))
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE orders
            SET subtotal_cents = (
                    SELECT COALESCE(SUM(i.line_total_cents), 0)
                    FROM order_items i
                    WHERE i.order_id = orders.id),
                total_cents = (
                    SELECT COALESCE(SUM(i.line_total_cents), 0)
                    FROM order_items i
                    WHERE i.order_id = orders.id) + delivery_fee_cents
            WHERE status IN ('open', 'preparing', 'ready')
            "#,
        )
        .execute(&mut *tx)
        .await?;

        // 5. Finally the product row; terminal-order FKs go NULL here.
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(product_id = %id, "Product deleted");
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

    #[tokio::test]
    async fn test_insert_pizza_and_get() {
        let db = test_db().await;
        let pizza = db
            .products()
            .insert(
                "Margherita",
                ProductCategory::Pizza,
                ProductPricing::Sized {
                    p_cents: 2500,
                    m_cents: 3000,
                    g_cents: 3800,
                },
            )
            .await
            .unwrap();

        let fetched = db.products().get_by_id(&pizza.id).await.unwrap();
        assert_eq!(fetched.name, "Margherita");
        assert_eq!(
            fetched.tier_price(pizzaria_core::PizzaSize::G).unwrap().cents(),
            3800
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_mismatched_pricing() {
        let db = test_db().await;

        // A pizza with a flat price never reaches the database
        let err = db
            .products()
            .insert(
                "Broken",
                ProductCategory::Pizza,
                ProductPricing::Flat { price_cents: 3000 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");

        // Nor a drink with a size schedule
        let err = db
            .products()
            .insert(
                "Broken",
                ProductCategory::Drink,
                ProductPricing::Sized {
                    p_cents: 1,
                    m_cents: 2,
                    g_cents: 3,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");
    }

    #[tokio::test]
    async fn test_list_filtered_by_category() {
        let db = test_db().await;
        db.products()
            .insert(
                "Margherita",
                ProductCategory::Pizza,
                ProductPricing::Sized {
                    p_cents: 2500,
                    m_cents: 3000,
                    g_cents: 3800,
                },
            )
            .await
            .unwrap();
        db.products()
            .insert(
                "Guaraná Lata",
                ProductCategory::Drink,
                ProductPricing::Flat { price_cents: 600 },
            )
            .await
            .unwrap();

        let drinks = db
            .products()
            .list(Some(ProductCategory::Drink))
            .await
            .unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].name, "Guaraná Lata");

        let all = db.products().list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_snapshot() {
        let db = test_db().await;
        let soda = db
            .products()
            .insert(
                "Guaraná Lata",
                ProductCategory::Drink,
                ProductPricing::Flat { price_cents: 600 },
            )
            .await
            .unwrap();

        let snapshot = db.products().catalog_snapshot().await.unwrap();
        use pizzaria_core::Catalog;
        assert!(snapshot.product(&soda.id).is_some());
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = test_db().await;
        let err = db.products().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
