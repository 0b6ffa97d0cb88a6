//! # Repository Module
//!
//! One repository per entity, each a thin struct over the shared pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │   CLI command                                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   db.orders().create(...)      ← repository method                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   pizzaria-core pricing/lifecycle (pure decisions)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   SQL in one transaction       ← persistence                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories own SQL and transactions; business decisions (prices,
//! legal status moves) are delegated to pizzaria-core.

pub mod customer;
pub mod order;
pub mod product;
