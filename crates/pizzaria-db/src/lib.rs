//! # pizzaria-db: Database Layer
//!
//! SQLite persistence for the pizzeria order system, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Data Flow                                    │
//! │                                                                     │
//! │  CLI command (order create)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  pizzaria-db (THIS CRATE)                     │  │
//! │  │                                                               │  │
//! │  │   ┌─────────────┐   ┌────────────────┐   ┌────────────────┐  │  │
//! │  │   │  Database   │   │  Repositories  │   │   Migrations   │  │  │
//! │  │   │  (pool.rs)  │◄──│ customer/      │   │   (embedded)   │  │  │
//! │  │   │             │   │ product/order  │   │ 001_init.sql   │  │  │
//! │  │   └─────────────┘   └────────────────┘   └────────────────┘  │  │
//! │  │                            │                                  │  │
//! │  │                            ▼                                  │  │
//! │  │              pizzaria-core (pricing, lifecycle)               │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, product, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pizzaria_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pizzaria.db")).await?;
//! let order = db.orders().create(&customer_id, &cart, payment, fulfillment).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::{CustomerInput, CustomerRepository};
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
