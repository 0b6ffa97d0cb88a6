//! # Receipt Files
//!
//! Writes the core's receipt text to disk, one file per order.
//!
//! The file name is derived from the order id (`pedido_<order-id>.txt`),
//! so regenerating a receipt overwrites the previous copy with identical
//! bytes rather than accumulating duplicates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use pizzaria_core::receipt::format_receipt;
use pizzaria_core::{Customer, Order};

/// Renders and writes the receipt file, returning its path.
pub fn write_receipt(dir: &Path, order: &Order, customer: &Customer) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating receipts directory {}", dir.display()))?;

    let path = dir.join(format!("pedido_{}.txt", order.id));
    let text = format_receipt(order, customer);
    fs::write(&path, &text)
        .with_context(|| format!("writing receipt {}", path.display()))?;

    info!(path = %path.display(), "Receipt written");
    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================
