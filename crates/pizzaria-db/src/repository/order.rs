//! # Order Repository
//!
//! Database operations for orders: checkout, retrieval, status moves.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create(customer_id, cart, payment, fulfillment)                    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  load customer (postal code) + catalog snapshot                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  pizzaria_core::price_order  ← all-or-nothing pricing               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  INSERT order + items + extras in ONE transaction                   │
//! │  (a failing line means nothing was written)                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status moves load the current row and delegate the decision to
//! `pizzaria_core::lifecycle`; the repository only persists the outcome.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use pizzaria_core::{
    lifecycle, price_order, CartLine, FulfillmentType, ModifierSnapshot, Order, OrderLineItem,
    OrderStatus, OrderSummary, PaymentMethod, PizzaSize,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
    payment: PaymentMethod,
    fulfillment: FulfillmentType,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    order_id: String,
    product_id: Option<String>,
    name_snapshot: String,
    size: Option<PizzaSize>,
    quantity: i64,
    unit_price_cents: i64,
    line_total_cents: i64,
    crust_product_id: Option<String>,
    crust_name: Option<String>,
    crust_price_cents: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct ExtraRow {
    order_item_id: String,
    product_id: Option<String>,
    name_snapshot: String,
    price_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: String,
    customer_id: String,
    customer_name: String,
    customer_phone: String,
    customer_address: String,
    total_cents: i64,
    payment: PaymentMethod,
    fulfillment: FulfillmentType,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<SummaryRow> for OrderSummary {
    fn from(row: SummaryRow) -> Self {
        OrderSummary {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            total_cents: row.total_cents,
            payment: row.payment,
            fulfillment: row.fulfillment,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

const SUMMARY_QUERY: &str = r#"
    SELECT o.id, o.customer_id,
           c.name AS customer_name,
           c.phone AS customer_phone,
           c.address AS customer_address,
           o.total_cents, o.payment, o.fulfillment, o.status, o.created_at
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order from a cart: prices it, freezes the snapshots and
    /// persists order, items and extras in one transaction.
    ///
    /// A new order always starts in `open` with the current timestamp.
    pub async fn create(
        &self,
        customer_id: &str,
        cart: &[CartLine],
        payment: PaymentMethod,
        fulfillment: FulfillmentType,
    ) -> DbResult<Order> {
        let customer = CustomerRepository::new(self.pool.clone())
            .get_by_id(customer_id)
            .await?;
        let catalog = ProductRepository::new(self.pool.clone())
            .catalog_snapshot()
            .await?;

        let quote = price_order(cart, fulfillment, &customer.postal_code, &catalog)?;

        let order_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        debug!(
            order_id = %order_id,
            customer_id = %customer_id,
            total_cents = quote.total_cents,
            "Creating order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, customer_id, subtotal_cents, delivery_fee_cents, total_cents,
                 payment, fulfillment, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'open', ?8)
            "#,
        )
        .bind(&order_id)
        .bind(customer_id)
        .bind(quote.subtotal_cents)
        .bind(quote.delivery_fee_cents)
        .bind(quote.total_cents)
        .bind(payment)
        .bind(fulfillment)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in quote.lines.iter().enumerate() {
            let item_id = Uuid::new_v4().to_string();
            let crust = line.crust.as_ref();

            sqlx::query(
                r#"
                INSERT INTO order_items
                    (id, order_id, product_id, name_snapshot, size, quantity,
                     unit_price_cents, line_total_cents,
                     crust_product_id, crust_name, crust_price_cents, position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )
            .bind(&item_id)
            .bind(&order_id)
            .bind(&line.product_id)
            .bind(&line.name)
            .bind(line.size)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_total_cents)
            .bind(crust.and_then(|c| c.product_id.as_deref()))
            .bind(crust.map(|c| c.name.as_str()))
            .bind(crust.map(|c| c.price_cents))
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;

            for (extra_pos, extra) in line.extras.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO order_item_extras
                        (id, order_item_id, product_id, name_snapshot, price_cents, position)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&item_id)
                .bind(extra.product_id.as_deref())
                .bind(&extra.name)
                .bind(extra.price_cents)
                .bind(extra_pos as i64)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get_by_id(&order_id).await
    }

    /// Fetches a full order: row, items in sequence, extras per item.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_id, subtotal_cents, delivery_fee_cents, total_cents,
                   payment, fulfillment, status, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, order_id, product_id, name_snapshot, size, quantity,
                   unit_price_cents, line_total_cents,
                   crust_product_id, crust_name, crust_price_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let extra_rows = sqlx::query_as::<_, ExtraRow>(
            r#"
            SELECT e.order_item_id, e.product_id, e.name_snapshot, e.price_cents
            FROM order_item_extras e
            JOIN order_items i ON i.id = e.order_item_id
            WHERE i.order_id = ?1
            ORDER BY e.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(item_rows.len());
        for item in item_rows {
            let crust = item.crust_name.as_ref().map(|name| ModifierSnapshot {
                product_id: item.crust_product_id.clone(),
                name: name.clone(),
                price_cents: item.crust_price_cents.unwrap_or(0),
            });
            let extras = extra_rows
                .iter()
                .filter(|e| e.order_item_id == item.id)
                .map(|e| ModifierSnapshot {
                    product_id: e.product_id.clone(),
                    name: e.name_snapshot.clone(),
                    price_cents: e.price_cents,
                })
                .collect();

            items.push(OrderLineItem {
                id: item.id,
                order_id: item.order_id,
                product_id: item.product_id,
                name_snapshot: item.name_snapshot,
                size: item.size,
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                line_total_cents: item.line_total_cents,
                crust,
                extras,
            });
        }

        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            items,
            subtotal_cents: row.subtotal_cents,
            delivery_fee_cents: row.delivery_fee_cents,
            total_cents: row.total_cents,
            payment: row.payment,
            fulfillment: row.fulfillment,
            status: row.status,
            created_at: row.created_at,
        })
    }

    /// Lists all orders, newest first, with denormalized customer columns.
    pub async fn list(&self) -> DbResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "{SUMMARY_QUERY} ORDER BY o.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderSummary::from).collect())
    }

    /// Lists one customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "{SUMMARY_QUERY} WHERE o.customer_id = ?1 ORDER BY o.created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderSummary::from).collect())
    }

    /// Moves an order to an explicitly requested status.
    ///
    /// Legal moves are decided by the core: exactly one step forward, or
    /// cancellation from any non-terminal state.
    pub async fn update_status(&self, id: &str, requested: OrderStatus) -> DbResult<Order> {
        let current = self.current_status(id).await?;
        let next = lifecycle::transition(current, requested)?;
        self.persist_status(id, next).await?;
        self.get_by_id(id).await
    }

    /// Advances an order one step along the linear flow.
    pub async fn advance(&self, id: &str) -> DbResult<Order> {
        let current = self.current_status(id).await?;
        let next = lifecycle::advance(current)?;
        self.persist_status(id, next).await?;
        self.get_by_id(id).await
    }

    /// Cancels an order from any non-terminal state.
    pub async fn cancel(&self, id: &str) -> DbResult<Order> {
        let current = self.current_status(id).await?;
        let next = lifecycle::cancel(current)?;
        self.persist_status(id, next).await?;
        self.get_by_id(id).await
    }

    /// Deletes an order outright (items and extras cascade).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(order_id = %id, "Order deleted");
        Ok(())
    }

    async fn current_status(&self, id: &str) -> DbResult<OrderStatus> {
        sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    async fn persist_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = %id, status = %status, "Updating order status");
        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
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
    use crate::repository::customer::CustomerInput;
    use pizzaria_core::{ProductCategory, ProductPricing};

    struct Fixture {
        db: Database,
        customer_id: String,
        margherita_id: String,
        soda_id: String,
        queijo_id: String,
        catupiry_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .customers()
            .insert(CustomerInput {
                name: "Maria Silva".into(),
                phone: "11 99999-0000".into(),
                postal_code: "01310-100".into(), // suffix 00 → near tier
                address: "Av. Paulista, 1000".into(),
                complement: None,
            })
            .await
            .unwrap();

        let margherita = db
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
        let soda = db
            .products()
            .insert(
                "Guaraná Lata",
                ProductCategory::Drink,
                ProductPricing::Flat { price_cents: 600 },
            )
            .await
            .unwrap();
        let queijo = db
            .products()
            .insert(
                "Extra queijo",
                ProductCategory::Extra,
                ProductPricing::Flat { price_cents: 500 },
            )
            .await
            .unwrap();
        let catupiry = db
            .products()
            .insert(
                "Borda de catupiry",
                ProductCategory::Crust,
                ProductPricing::Flat { price_cents: 800 },
            )
            .await
            .unwrap();

        Fixture {
            db,
            customer_id: customer.id,
            margherita_id: margherita.id,
            soda_id: soda.id,
            queijo_id: queijo.id,
            catupiry_id: catupiry.id,
        }
    }

    fn pickup_cart(f: &Fixture) -> Vec<CartLine> {
        vec![
            CartLine::new(&f.margherita_id, 1)
                .with_size(PizzaSize::M)
                .with_extra(&f.queijo_id),
            CartLine::new(&f.soda_id, 1),
        ]
    }

    #[tokio::test]
    async fn test_create_pickup_order_totals() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        assert_eq!(order.subtotal_cents, 4100);
        assert_eq!(order.delivery_fee_cents, 0);
        assert_eq!(order.total_cents, 4100);
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name_snapshot, "Margherita");
        assert_eq!(order.items[0].extras.len(), 1);
    }

    #[tokio::test]
    async fn test_create_delivery_order_adds_fee() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Card,
                FulfillmentType::Delivery,
            )
            .await
            .unwrap();

        assert_eq!(order.delivery_fee_cents, 800); // postal suffix 00
        assert_eq!(order.total_cents, 4900);
    }

    #[tokio::test]
    async fn test_create_with_unknown_product_writes_nothing() {
        let f = fixture().await;
        let cart = vec![
            CartLine::new(&f.soda_id, 1),
            CartLine::new("does-not-exist", 1),
        ];

        let err = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &cart,
                PaymentMethod::Cash,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");

        assert!(f.db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_for_unknown_customer() {
        let f = fixture().await;
        let err = f
            .db
            .orders()
            .create(
                "ghost",
                &pickup_cart(&f),
                PaymentMethod::Cash,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_advance_walks_to_delivered_then_stops() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        for expected in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            let updated = f.db.orders().advance(&order.id).await.unwrap();
            assert_eq!(updated.status, expected);
        }

        let err = f.db.orders().advance(&order.id).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");
    }

    #[tokio::test]
    async fn test_update_status_rejects_skip() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        let err = f
            .db
            .orders()
            .update_status(&order.id, OrderStatus::Ready)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");

        // Status unchanged after the rejected move
        let reloaded = f.db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_cancel_then_cancel_again_fails() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        let cancelled = f.db.orders().cancel(&order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = f.db.orders().cancel(&order.id).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)), "{err}");
    }

    #[tokio::test]
    async fn test_list_and_customer_history() {
        let f = fixture().await;
        f.db.orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        let all = f.db.orders().list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].customer_name, "Maria Silva");

        let history = f
            .db
            .orders()
            .list_for_customer(&f.customer_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);

        let none = f.db.orders().list_for_customer("ghost").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_customer_delete_blocked_by_open_order() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        let err = f.db.customers().delete(&f.customer_id).await.unwrap_err();
        assert!(matches!(err, DbError::CustomerHasOpenOrders { .. }), "{err}");

        // The refused delete must leave the customer row in place.
        f.db.customers().get_by_id(&f.customer_id).await.unwrap();

        // Once the order reaches a terminal state the customer can go,
        // taking the history with them.
        f.db.orders().cancel(&order.id).await.unwrap();
        f.db.customers().delete(&f.customer_id).await.unwrap();

        let err = f.db.orders().get_by_id(&order.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_product_delete_recomputes_open_order() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();
        assert_eq!(order.total_cents, 4100);

        // Deleting the extra drops R$ 5.00 from the pizza's unit price
        f.db.products().delete(&f.queijo_id).await.unwrap();

        let reloaded = f.db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(reloaded.items[0].unit_price_cents, 3000);
        assert!(reloaded.items[0].extras.is_empty());
        assert_eq!(reloaded.subtotal_cents, 3600);
        assert_eq!(reloaded.total_cents, 3600);
    }

    #[tokio::test]
    async fn test_product_delete_removes_line_from_open_order() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        // Deleting the soda removes its whole line
        f.db.products().delete(&f.soda_id).await.unwrap();

        let reloaded = f.db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(reloaded.items.len(), 1);
        assert_eq!(reloaded.subtotal_cents, 3500);
        assert_eq!(reloaded.total_cents, 3500);
    }

    #[tokio::test]
    async fn test_product_delete_preserves_terminal_history() {
        let f = fixture().await;
        let cart = vec![CartLine::new(&f.margherita_id, 1)
            .with_size(PizzaSize::G)
            .with_crust(&f.catupiry_id)];
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &cart,
                PaymentMethod::Cash,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();
        assert_eq!(order.total_cents, 4600); // 3800 + 800 crust

        // Deliver it, then delete both products
        for _ in 0..3 {
            f.db.orders().advance(&order.id).await.unwrap();
        }
        f.db.products().delete(&f.catupiry_id).await.unwrap();
        f.db.products().delete(&f.margherita_id).await.unwrap();

        // Snapshots and totals untouched; product refs nulled by FK
        let reloaded = f.db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(reloaded.total_cents, 4600);
        assert_eq!(reloaded.items[0].name_snapshot, "Margherita");
        assert!(reloaded.items[0].product_id.is_none());
        let crust = reloaded.items[0].crust.as_ref().unwrap();
        assert_eq!(crust.name, "Borda de catupiry");
        assert_eq!(crust.price_cents, 800);
        assert!(crust.product_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_order() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create(
                &f.customer_id,
                &pickup_cart(&f),
                PaymentMethod::Pix,
                FulfillmentType::Pickup,
            )
            .await
            .unwrap();

        f.db.orders().delete(&order.id).await.unwrap();
        let err = f.db.orders().get_by_id(&order.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
