//! # Pricing Engine
//!
//! Computes unit prices, line totals and order totals for a cart.
//!
//! ## How a line is priced
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CartLine { product, qty, size?, crust?, extras[] }                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  base  = pizza ? tier price for size (default M) : flat price       │
//! │  unit  = base + crust price + Σ extra prices                        │
//! │  line  = unit × qty                                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  subtotal = Σ line totals                                           │
//! │  total    = subtotal + delivery fee (0 for pickup)                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs: the caller hands in
//! a catalog snapshot and gets back a quote. The first failing line
//! aborts the whole computation; no partial result is ever returned.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    CartLine, FulfillmentType, ModifierSnapshot, PizzaSize, Product, ProductCategory,
};
use crate::validation::{validate_quantity, MAX_ORDER_LINES};

// =============================================================================
// Catalog
// =============================================================================

/// Read access to product definitions, as seen by the pricing engine.
///
/// The engine never touches storage: the calling layer materializes a
/// snapshot (usually [`CatalogSnapshot`]) and passes it in.
pub trait Catalog {
    fn product(&self, id: &str) -> Option<&Product>;
}

/// An in-memory catalog snapshot keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<String, Product>,
}

impl CatalogSnapshot {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        CatalogSnapshot {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for CatalogSnapshot {
    fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }
}

// =============================================================================
// Priced results
// =============================================================================

/// A cart line after pricing: snapshots frozen, totals computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub size: Option<PizzaSize>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub crust: Option<ModifierSnapshot>,
    pub extras: Vec<ModifierSnapshot>,
}

impl PricedLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// The complete priced cart: lines plus order totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQuote {
    pub lines: Vec<PricedLine>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

impl OrderQuote {
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

// =============================================================================
// Line pricing
// =============================================================================

/// Prices a single cart line against a catalog snapshot.
///
/// ## Rules
/// 1. Quantity must be >= 1 (`InvalidQuantity`) and within
///    `MAX_ITEM_QUANTITY` (`ValidationError::OutOfRange`) — the cap also
///    keeps line totals well inside i64 range
/// 2. The product must exist (`ReferenceNotFound`)
/// 3. Pizzas price by tier; an omitted size resolves to the documented
///    default tier M (never P or G). A pizza whose catalog entry carries
///    no tier schedule is `IncompletePricingData`.
/// 4. Size, crust and extras are pizza-only concepts; using them on a
///    non-pizza line is a validation error, not a silent ignore.
/// 5. Crusts must reference a `crust` product, extras an `extra` product;
///    a dangling id is `ReferenceNotFound`, a wrong category is rejected.
pub fn price_line(line: &CartLine, catalog: &impl Catalog) -> CoreResult<PricedLine> {
    if line.quantity < 1 {
        return Err(CoreError::InvalidQuantity {
            quantity: line.quantity,
        });
    }
    // Caps the quantity so unit_price × qty stays far from i64 overflow.
    validate_quantity(line.quantity).map_err(CoreError::from)?;

    let product = catalog
        .product(&line.product_id)
        .ok_or_else(|| CoreError::ReferenceNotFound {
            kind: "Product",
            id: line.product_id.clone(),
        })?;

    let is_pizza = product.category == ProductCategory::Pizza;

    if !is_pizza {
        if line.size.is_some() {
            return Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: vec!["(pizza items only)".to_string()],
            }
            .into());
        }
        if line.crust_id.is_some() || !line.extra_ids.is_empty() {
            return Err(ValidationError::NotAllowed {
                field: "modifiers".to_string(),
                allowed: vec!["(pizza items only)".to_string()],
            }
            .into());
        }
    }

    let (base, size) = if is_pizza {
        let size = line.size.unwrap_or(PizzaSize::DEFAULT);
        let base = product
            .tier_price(size)
            .ok_or_else(|| CoreError::IncompletePricingData {
                product_id: product.id.clone(),
            })?;
        (base, Some(size))
    } else {
        let base = product
            .flat_price()
            .ok_or_else(|| CoreError::IncompletePricingData {
                product_id: product.id.clone(),
            })?;
        (base, None)
    };

    let crust = match &line.crust_id {
        Some(id) => Some(resolve_modifier(catalog, id, ProductCategory::Crust, "crust")?),
        None => None,
    };

    let mut extras = Vec::with_capacity(line.extra_ids.len());
    for id in &line.extra_ids {
        extras.push(resolve_modifier(catalog, id, ProductCategory::Extra, "extra")?);
    }

    let mut unit = base;
    if let Some(c) = &crust {
        unit += c.price();
    }
    for e in &extras {
        unit += e.price();
    }

    let line_total = unit.multiply_quantity(line.quantity);

    Ok(PricedLine {
        product_id: product.id.clone(),
        name: product.name.clone(),
        size,
        quantity: line.quantity,
        unit_price_cents: unit.cents(),
        line_total_cents: line_total.cents(),
        crust,
        extras,
    })
}

/// Resolves a crust/extra reference into a frozen snapshot.
fn resolve_modifier(
    catalog: &impl Catalog,
    id: &str,
    expected: ProductCategory,
    kind: &'static str,
) -> CoreResult<ModifierSnapshot> {
    let product = catalog
        .product(id)
        .ok_or_else(|| CoreError::ReferenceNotFound {
            kind: match expected {
                ProductCategory::Crust => "Crust",
                _ => "Extra",
            },
            id: id.to_string(),
        })?;

    if product.category != expected {
        return Err(ValidationError::NotAllowed {
            field: kind.to_string(),
            allowed: vec![format!("products with category '{}'", expected.as_str())],
        }
        .into());
    }

    let price = product
        .flat_price()
        .ok_or_else(|| CoreError::IncompletePricingData {
            product_id: product.id.clone(),
        })?;

    Ok(ModifierSnapshot {
        product_id: Some(product.id.clone()),
        name: product.name.clone(),
        price_cents: price.cents(),
    })
}

// =============================================================================
// Delivery fee
// =============================================================================

/// Delivery fee tiers in cents, selected by postal-code suffix.
const FEE_NEAR_CENTS: i64 = 800; // suffix 00-33
const FEE_MID_CENTS: i64 = 1000; // suffix 34-66, and unparsable codes
const FEE_FAR_CENTS: i64 = 1200; // suffix 67-99

/// Computes the delivery fee as a pure function of the postal code.
///
/// Pickup is always free. For delivery, the numeric value of the last
/// two digits of the postal code picks the tier: 00-33 near, 34-66 mid,
/// 67-99 far. A code with no digits at all falls in the mid tier.
pub fn delivery_fee(fulfillment: FulfillmentType, postal_code: &str) -> Money {
    if fulfillment == FulfillmentType::Pickup {
        return Money::zero();
    }

    let digits: Vec<u32> = postal_code.chars().filter_map(|c| c.to_digit(10)).collect();
    let suffix = match digits.as_slice() {
        [] => return Money::from_cents(FEE_MID_CENTS),
        [single] => *single,
        [.., tens, ones] => tens * 10 + ones,
    };

    let cents = match suffix {
        0..=33 => FEE_NEAR_CENTS,
        34..=66 => FEE_MID_CENTS,
        _ => FEE_FAR_CENTS,
    };
    Money::from_cents(cents)
}

// =============================================================================
// Order pricing
// =============================================================================

/// Prices a whole cart: every line, the subtotal, the delivery fee and
/// the total. All-or-nothing: the first failing line fails the order.
pub fn price_order(
    lines: &[CartLine],
    fulfillment: FulfillmentType,
    postal_code: &str,
    catalog: &impl Catalog,
) -> CoreResult<OrderQuote> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }
    if lines.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        }
        .into());
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut subtotal = Money::zero();
    for line in lines {
        let p = price_line(line, catalog)?;
        subtotal += p.line_total();
        priced.push(p);
    }

    let fee = delivery_fee(fulfillment, postal_code);
    let total = subtotal + fee;

    Ok(OrderQuote {
        lines: priced,
        subtotal_cents: subtotal.cents(),
        delivery_fee_cents: fee.cents(),
        total_cents: total.cents(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
