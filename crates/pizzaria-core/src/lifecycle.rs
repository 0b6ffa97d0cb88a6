//! # Order Lifecycle
//!
//! Status transition rules for orders.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   open ──▶ preparing ──▶ ready ──▶ delivered (terminal)             │
//! │     │          │           │                                        │
//! │     └──────────┴───────────┴─────▶ cancelled (terminal)             │
//! │                                                                     │
//! │   One step at a time. No skipping, no reopening, no transition      │
//! │   out of a terminal state.                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These functions decide transitions only; persisting the new status is
//! the repository's job.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::OrderStatus;

/// Advances an order one step along the linear flow.
///
/// ## Edge Cases
/// - `delivered` / `cancelled`: returns `TerminalState`, never wraps around
pub fn advance(current: OrderStatus) -> CoreResult<OrderStatus> {
    match current {
        OrderStatus::Open => Ok(OrderStatus::Preparing),
        OrderStatus::Preparing => Ok(OrderStatus::Ready),
        OrderStatus::Ready => Ok(OrderStatus::Delivered),
        OrderStatus::Delivered | OrderStatus::Cancelled => {
            Err(CoreError::TerminalState { status: current })
        }
    }
}

/// Cancels an order from any non-terminal state.
pub fn cancel(current: OrderStatus) -> CoreResult<OrderStatus> {
    if current.is_terminal() {
        return Err(CoreError::TerminalState { status: current });
    }
    Ok(OrderStatus::Cancelled)
}

/// Validates an explicitly requested transition.
///
/// Accepts exactly two moves from a non-terminal state: the next step in
/// the linear flow, or cancellation. A skip (e.g. `open → ready`) or a
/// backward move is rejected with the set of statuses that would have
/// been legal.
pub fn transition(current: OrderStatus, requested: OrderStatus) -> CoreResult<OrderStatus> {
    if current.is_terminal() {
        return Err(CoreError::TerminalState { status: current });
    }
    if requested == OrderStatus::Cancelled {
        return Ok(OrderStatus::Cancelled);
    }

    // Non-terminal current always has a next step.
    let next = advance(current)?;
    if requested == next {
        return Ok(next);
    }

    Err(ValidationError::NotAllowed {
        field: "status".to_string(),
        allowed: vec![next.as_str().to_string(), "cancelled".to_string()],
    }
    .into())
}

// =============================================================================
// Unit Tests
// =============================================================================
