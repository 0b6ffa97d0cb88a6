//! # pizzaria-core: Pure Business Logic
//!
//! Core business logic for the pizzeria order system. This crate holds
//! everything that can be computed from values alone.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   apps/cli ──────────┐                                              │
//! │                      ▼                                              │
//! │                 pizzaria-db  (sqlx / SQLite)                        │
//! │                      │                                              │
//! │                      ▼                                              │
//! │               pizzaria-core  ◀── YOU ARE HERE                       │
//! │                                                                     │
//! │   Dependencies flow downward only. This crate performs no I/O:      │
//! │   callers hand in snapshots (catalog, order) and persist the        │
//! │   values that come back.                                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`money`]: integer-cent `Money` type, decimal parsing, display
//! - [`types`]: domain model (customers, products, orders, enums)
//! - [`pricing`]: the pricing engine and delivery-fee tiers
//! - [`lifecycle`]: order status transition rules
//! - [`receipt`]: deterministic text receipt formatter
//! - [`validation`]: boundary input validation
//! - [`error`]: `CoreError` / `ValidationError`

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod types;
pub mod validation;

// Re-export the types callers touch constantly.
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{
    delivery_fee, price_line, price_order, Catalog, CatalogSnapshot, OrderQuote, PricedLine,
};
pub use types::{
    CartLine, Customer, FulfillmentType, ModifierSnapshot, Order, OrderLineItem, OrderStatus,
    OrderSummary, PaymentMethod, PizzaSize, Product, ProductCategory, ProductPricing,
};
