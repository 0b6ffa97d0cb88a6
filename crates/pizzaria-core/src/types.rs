//! # Domain Types
//!
//! Core domain types for the pizzeria order system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────┐        │
//! │  │   Customer    │   │    Product    │   │     Order      │        │
//! │  │  ───────────  │   │  ───────────  │   │  ────────────  │        │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)     │        │
//! │  │  name, phone  │   │  category     │   │  customer_id   │        │
//! │  │  postal_code  │   │  pricing:     │   │  items[]       │        │
//! │  │  address      │   │   Flat | P/M/G│   │  totals, status│        │
//! │  └───────────────┘   └───────────────┘   └────────────────┘        │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────┐        │
//! │  │  PizzaSize    │   │  OrderStatus  │   │ PaymentMethod  │        │
//! │  │  P | M | G    │   │  open → ...   │   │ Cash|Card|Pix  │        │
//! │  └───────────────┘   └───────────────┘   └────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order line items freeze product names and prices at checkout time.
//! A later price change or product deletion never rewrites history;
//! `product_id` on a line item is `Option` because the product row may
//! be gone while the snapshot survives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Pizza Size
// =============================================================================

/// One of the three tiers of a pizza's price schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
pub enum PizzaSize {
    P,
    M,
    G,
}

impl PizzaSize {
    /// The tier used when a pizza line omits a size.
    ///
    /// This default is a deliberate business policy (confirmed against the
    /// historical behavior, which prompted `Tamanho (P/M/G) [M]`), not a
    /// silent fallback: an unspecified size always resolves to M, never
    /// to P or G.
    pub const DEFAULT: PizzaSize = PizzaSize::M;

    pub const fn as_str(&self) -> &'static str {
        match self {
            PizzaSize::P => "P",
            PizzaSize::M => "M",
            PizzaSize::G => "G",
        }
    }

    /// Parses a size letter, rejecting anything outside P/M/G.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_uppercase().as_str() {
            "P" => Ok(PizzaSize::P),
            "M" => Ok(PizzaSize::M),
            "G" => Ok(PizzaSize::G),
            _ => Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: vec!["P".into(), "M".into(), "G".into()],
            }),
        }
    }

    /// Receipt label.
    pub const fn label(&self) -> &'static str {
        self.as_str()
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// Product categories. The category determines the pricing representation:
/// pizzas carry a P/M/G schedule, everything else a single flat price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Pizza,
    Drink,
    Dessert,
    /// Topping added onto a pizza (queijo extra, bacon, ...).
    Extra,
    /// Stuffed crust option (borda de catupiry, ...).
    Crust,
    Other,
}

impl ProductCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Pizza => "pizza",
            ProductCategory::Drink => "drink",
            ProductCategory::Dessert => "dessert",
            ProductCategory::Extra => "extra",
            ProductCategory::Crust => "crust",
            ProductCategory::Other => "other",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pizza" => Ok(ProductCategory::Pizza),
            "drink" => Ok(ProductCategory::Drink),
            "dessert" => Ok(ProductCategory::Dessert),
            "extra" | "topping" => Ok(ProductCategory::Extra),
            "crust" => Ok(ProductCategory::Crust),
            "other" => Ok(ProductCategory::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: vec![
                    "pizza".into(),
                    "drink".into(),
                    "dessert".into(),
                    "extra".into(),
                    "crust".into(),
                    "other".into(),
                ],
            }),
        }
    }
}

// =============================================================================
// Payment / Fulfillment
// =============================================================================

/// Recognized payment methods. Anything else at the boundary is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pix,
}

impl PaymentMethod {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "pix" => Ok(PaymentMethod::Pix),
            _ => Err(ValidationError::NotAllowed {
                field: "payment".to_string(),
                allowed: vec!["cash".into(), "card".into(), "pix".into()],
            }),
        }
    }

    /// Receipt label (the receipts keep the house's Portuguese wording).
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Pix => "Pix",
        }
    }
}

/// Whether the order is delivered or picked up in-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentType {
    Delivery,
    Pickup,
}

impl FulfillmentType {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(FulfillmentType::Delivery),
            "pickup" => Ok(FulfillmentType::Pickup),
            _ => Err(ValidationError::NotAllowed {
                field: "fulfillment".to_string(),
                allowed: vec!["delivery".into(), "pickup".into()],
            }),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            FulfillmentType::Delivery => "Entrega",
            FulfillmentType::Pickup => "Retirada",
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle status.
///
/// Linear flow `Open → Preparing → Ready → Delivered` with a side-exit to
/// `Cancelled` from any non-terminal state. See [`crate::lifecycle`] for
/// the transition functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(OrderStatus::Open),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    "open".into(),
                    "preparing".into(),
                    "ready".into(),
                    "delivered".into(),
                    "cancelled".into(),
                ],
            }),
        }
    }

    /// Terminal states accept no further transition.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Receipt label.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Open => "aberto",
            OrderStatus::Preparing => "preparando",
            OrderStatus::Ready => "pronto",
            OrderStatus::Delivered => "entregue",
            OrderStatus::Cancelled => "cancelado",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
///
/// Created on first order or explicit registration; immutable afterwards
/// except for explicit edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub phone: String,

    /// Postal code (CEP). Drives the delivery-fee tier.
    pub postal_code: String,

    /// Street address (rua, número, bairro).
    pub address: String,

    /// Optional complement (apartment, reference point).
    pub complement: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// The pricing representation of a product.
///
/// Exactly one representation applies, determined by category:
/// pizzas are `Sized`, everything else is `Flat`. The pairing is enforced
/// by [`Product::validate`] and again by a database CHECK constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductPricing {
    Flat {
        price_cents: i64,
    },
    Sized {
        p_cents: i64,
        m_cents: i64,
        g_cents: i64,
    },
}

/// A product on the menu: pizza, drink, dessert, crust option or extra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and on receipts.
    pub name: String,

    pub category: ProductCategory,

    pub pricing: ProductPricing,

    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a pizza with a full P/M/G price schedule.
    pub fn pizza(
        id: impl Into<String>,
        name: impl Into<String>,
        p_cents: i64,
        m_cents: i64,
        g_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category: ProductCategory::Pizza,
            pricing: ProductPricing::Sized {
                p_cents,
                m_cents,
                g_cents,
            },
            created_at,
        }
    }

    /// Creates a flat-priced product (anything but a pizza).
    pub fn flat(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ProductCategory,
        price_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category,
            pricing: ProductPricing::Flat { price_cents },
            created_at,
        }
    }

    /// Checks the category/pricing pairing invariant and price signs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (&self.category, &self.pricing) {
            (ProductCategory::Pizza, ProductPricing::Sized { p_cents, m_cents, g_cents }) => {
                for (field, cents) in [("price P", p_cents), ("price M", m_cents), ("price G", g_cents)] {
                    crate::validation::validate_price_cents(field, *cents)?;
                }
                Ok(())
            }
            (ProductCategory::Pizza, ProductPricing::Flat { .. }) => {
                Err(ValidationError::InvalidFormat {
                    field: "pricing".to_string(),
                    reason: "pizza requires P/M/G prices".to_string(),
                })
            }
            (_, ProductPricing::Sized { .. }) => Err(ValidationError::InvalidFormat {
                field: "pricing".to_string(),
                reason: "only pizzas carry size-tiered prices".to_string(),
            }),
            (_, ProductPricing::Flat { price_cents }) => {
                crate::validation::validate_price_cents("price", *price_cents)?;
                Ok(())
            }
        }
    }

    /// Flat price, if this is a non-pizza product.
    pub fn flat_price(&self) -> Option<Money> {
        match &self.pricing {
            ProductPricing::Flat { price_cents } => Some(Money::from_cents(*price_cents)),
            ProductPricing::Sized { .. } => None,
        }
    }

    /// Tier price for the given size, if this is a pizza.
    pub fn tier_price(&self, size: PizzaSize) -> Option<Money> {
        match &self.pricing {
            ProductPricing::Sized { p_cents, m_cents, g_cents } => {
                let cents = match size {
                    PizzaSize::P => *p_cents,
                    PizzaSize::M => *m_cents,
                    PizzaSize::G => *g_cents,
                };
                Some(Money::from_cents(cents))
            }
            ProductPricing::Flat { .. } => None,
        }
    }
}

// =============================================================================
// Cart Line (pricing input)
// =============================================================================

/// One unpriced entry in a cart: product selection, quantity, modifiers.
///
/// This is the single unified line-item model; older "bare product id"
/// forms are the subset with no size, no crust and no extras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,

    /// Integer quantity, must be >= 1.
    pub quantity: i64,

    /// Required and meaningful only for pizzas. Omitted size on a pizza
    /// resolves to [`PizzaSize::DEFAULT`].
    pub size: Option<PizzaSize>,

    /// Optional stuffed-crust reference (product with category `crust`).
    pub crust_id: Option<String>,

    /// Optional extras (products with category `extra`).
    pub extra_ids: Vec<String>,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        CartLine {
            product_id: product_id.into(),
            quantity,
            size: None,
            crust_id: None,
            extra_ids: Vec::new(),
        }
    }

    pub fn with_size(mut self, size: PizzaSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_crust(mut self, crust_id: impl Into<String>) -> Self {
        self.crust_id = Some(crust_id.into());
        self
    }

    pub fn with_extra(mut self, extra_id: impl Into<String>) -> Self {
        self.extra_ids.push(extra_id.into());
        self
    }
}

// =============================================================================
// Order Line Item (persisted, snapshot form)
// =============================================================================

/// A crust or extra frozen onto a line item at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSnapshot {
    /// Product id at checkout time; `None` once that product is deleted.
    pub product_id: Option<String>,

    /// Name at checkout time (frozen).
    pub name: String,

    /// Flat price at checkout time (frozen).
    pub price_cents: i64,
}

impl ModifierSnapshot {
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A line item in a persisted order. Prices and names are frozen.
///
/// Unit price = base tier/flat price + crust price + sum of extra prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: String,

    pub order_id: String,

    /// `None` once the referenced product has been deleted.
    pub product_id: Option<String>,

    /// Product name at checkout time (frozen).
    pub name_snapshot: String,

    /// Size, present only for pizza items.
    pub size: Option<PizzaSize>,

    pub quantity: i64,

    /// Unit price in cents, modifiers included (frozen).
    pub unit_price_cents: i64,

    /// unit_price × quantity.
    pub line_total_cents: i64,

    pub crust: Option<ModifierSnapshot>,

    pub extras: Vec<ModifierSnapshot>,
}

impl OrderLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order.
///
/// The item list is immutable after creation; status is the only field
/// that changes afterwards, via explicit admin action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    pub customer_id: String,

    /// Items in their original sequence.
    pub items: Vec<OrderLineItem>,

    /// Sum of line totals.
    pub subtotal_cents: i64,

    /// Zero for pickup; postal-code tier for delivery.
    pub delivery_fee_cents: i64,

    /// subtotal + delivery fee.
    pub total_cents: i64,

    pub payment: PaymentMethod,

    pub fulfillment: FulfillmentType,

    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Order list view with denormalized customer columns for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    pub fulfillment: FulfillmentType,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_parse() {
        assert_eq!(PizzaSize::parse("m").unwrap(), PizzaSize::M);
        assert_eq!(PizzaSize::parse(" G ").unwrap(), PizzaSize::G);
        assert!(PizzaSize::parse("XL").is_err());
        assert_eq!(PizzaSize::DEFAULT, PizzaSize::M);
    }

    #[test]
    fn test_enum_parsing_rejects_unknown_values() {
        assert!(PaymentMethod::parse("cheque").is_err());
        assert!(FulfillmentType::parse("drone").is_err());
        assert!(OrderStatus::parse("done").is_err());
        assert!(ProductCategory::parse("sandwich").is_err());
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!(PaymentMethod::parse("Pix").unwrap(), PaymentMethod::Pix);
        assert_eq!(
            FulfillmentType::parse("DELIVERY").unwrap(),
            FulfillmentType::Delivery
        );
        assert_eq!(OrderStatus::parse("Open").unwrap(), OrderStatus::Open);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_product_pricing_invariant() {
        let now = Utc::now();

        let pizza = Product::pizza("p1", "Margherita", 2500, 3000, 3800, now);
        assert!(pizza.validate().is_ok());
        assert_eq!(pizza.tier_price(PizzaSize::M).unwrap().cents(), 3000);
        assert!(pizza.flat_price().is_none());

        let soda = Product::flat("p2", "Guaraná 2L", ProductCategory::Drink, 1200, now);
        assert!(soda.validate().is_ok());
        assert_eq!(soda.flat_price().unwrap().cents(), 1200);
        assert!(soda.tier_price(PizzaSize::M).is_none());

        // A pizza with a flat price is corrupt data
        let broken = Product {
            id: "p3".into(),
            name: "Broken".into(),
            category: ProductCategory::Pizza,
            pricing: ProductPricing::Flat { price_cents: 3000 },
            created_at: now,
        };
        assert!(broken.validate().is_err());

        // And so is a drink with a size schedule
        let broken = Product {
            id: "p4".into(),
            name: "Broken".into(),
            category: ProductCategory::Drink,
            pricing: ProductPricing::Sized {
                p_cents: 1,
                m_cents: 2,
                g_cents: 3,
            },
            created_at: now,
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_prices() {
        let now = Utc::now();

        let pizza = Product::pizza("p1", "Margherita", 2500, -1, 3800, now);
        assert!(matches!(
            pizza.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));

        let soda = Product::flat("p2", "Guaraná", ProductCategory::Drink, -600, now);
        assert!(matches!(
            soda.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_cart_line_builder() {
        let line = CartLine::new("pizza-1", 2)
            .with_size(PizzaSize::G)
            .with_crust("crust-1")
            .with_extra("extra-1")
            .with_extra("extra-2");

        assert_eq!(line.quantity, 2);
        assert_eq!(line.size, Some(PizzaSize::G));
        assert_eq!(line.crust_id.as_deref(), Some("crust-1"));
        assert_eq!(line.extra_ids.len(), 2);
    }
}
