//! # Receipt Formatter
//!
//! Renders an order snapshot into the fixed-layout text receipt.
//!
//! ## Determinism
//! The receipt is a pure function of `(order, customer)`. Same inputs,
//! same bytes, every time: the timestamp comes from the order's stored
//! `created_at` (never the clock), items render in their stored
//! sequence, and every money value goes through the fixed two-decimal
//! `Money` display form. Callers may regenerate the file at will.
//!
//! ## Layout
//! ```text
//! ========================================
//!         PIZZARIA SABOR DE CASA
//! ========================================
//! Pedido: <order id>
//! Data: 30/08/2026 14:05
//!
//! Cliente: Maria Silva
//! Telefone: 11 99999-0000
//! Endereço: Av. Paulista, 1000
//! Complemento: apto 42            (only when present)
//!
//! --- Itens ---
//! Margherita (M) x1 -> Unit: R$ 43.00 | Total: R$ 43.00
//!   + Borda: Borda de catupiry (R$ 8.00)
//!   + Adicional: Extra queijo (R$ 5.00)
//! Guaraná Lata x2 -> Unit: R$ 6.00 | Total: R$ 12.00
//!
//! Subtotal: R$ 55.00
//! Taxa de entrega: R$ 8.00        (delivery with a positive fee only)
//! Total: R$ 63.00
//!
//! Pagamento: Pix | Entrega | Status: aberto
//! ========================================
//! ```

use std::fmt::Write;

use crate::types::{Customer, FulfillmentType, Order};

const RULE: &str = "========================================";
const BUSINESS_NAME: &str = "        PIZZARIA SABOR DE CASA";

/// Renders the full text receipt for an order.
///
/// Unit prices on item lines already include the crust and extras; the
/// indented `+` lines break those components out for the customer.
pub fn format_receipt(order: &Order, customer: &Customer) -> String {
    let mut out = String::with_capacity(512);

    // Writing into a String cannot fail; discard the fmt::Result.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{BUSINESS_NAME}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Pedido: {}", order.id);
    let _ = writeln!(out, "Data: {}", order.created_at.format("%d/%m/%Y %H:%M"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Cliente: {}", customer.name);
    let _ = writeln!(out, "Telefone: {}", customer.phone);
    let _ = writeln!(out, "Endereço: {}", customer.address);
    if let Some(complement) = &customer.complement {
        let _ = writeln!(out, "Complemento: {complement}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Itens ---");
    for item in &order.items {
        let size = match item.size {
            Some(s) => format!(" ({})", s.label()),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "{}{} x{} -> Unit: {} | Total: {}",
            item.name_snapshot,
            size,
            item.quantity,
            item.unit_price(),
            item.line_total(),
        );
        if let Some(crust) = &item.crust {
            let _ = writeln!(out, "  + Borda: {} ({})", crust.name, crust.price());
        }
        for extra in &item.extras {
            let _ = writeln!(out, "  + Adicional: {} ({})", extra.name, extra.price());
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Subtotal: {}", order.subtotal());
    if order.fulfillment == FulfillmentType::Delivery && order.delivery_fee().is_positive() {
        let _ = writeln!(out, "Taxa de entrega: {}", order.delivery_fee());
    }
    let _ = writeln!(out, "Total: {}", order.total());
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Pagamento: {} | {} | Status: {}",
        order.payment.label(),
        order.fulfillment.label(),
        order.status.label(),
    );
    let _ = writeln!(out, "{RULE}");

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ModifierSnapshot, OrderLineItem, OrderStatus, PaymentMethod, PizzaSize,
    };
    use chrono::{TimeZone, Utc};

    fn fixture() -> (Order, Customer) {
        let created_at = Utc.with_ymd_and_hms(2026, 8, 30, 14, 5, 0).unwrap();

        let customer = Customer {
            id: "c-1".into(),
            name: "Maria Silva".into(),
            phone: "11 99999-0000".into(),
            postal_code: "01310-100".into(),
            address: "Av. Paulista, 1000".into(),
            complement: Some("apto 42".into()),
            created_at,
        };

        let items = vec![
            OrderLineItem {
                id: "li-1".into(),
                order_id: "ord-1".into(),
                product_id: Some("pz-margherita".into()),
                name_snapshot: "Margherita".into(),
                size: Some(PizzaSize::M),
                quantity: 1,
                unit_price_cents: 4300, // 3000 base + 800 crust + 500 extra
                line_total_cents: 4300,
                crust: Some(ModifierSnapshot {
                    product_id: Some("cr-catupiry".into()),
                    name: "Borda de catupiry".into(),
                    price_cents: 800,
                }),
                extras: vec![ModifierSnapshot {
                    product_id: Some("xt-queijo".into()),
                    name: "Extra queijo".into(),
                    price_cents: 500,
                }],
            },
            OrderLineItem {
                id: "li-2".into(),
                order_id: "ord-1".into(),
                product_id: Some("dk-soda".into()),
                name_snapshot: "Guaraná Lata".into(),
                size: None,
                quantity: 2,
                unit_price_cents: 600,
                line_total_cents: 1200,
                crust: None,
                extras: vec![],
            },
        ];

        let order = Order {
            id: "ord-1".into(),
            customer_id: "c-1".into(),
            items,
            subtotal_cents: 5500,
            delivery_fee_cents: 800,
            total_cents: 6300,
            payment: PaymentMethod::Pix,
            fulfillment: FulfillmentType::Delivery,
            status: OrderStatus::Open,
            created_at,
        };

        (order, customer)
    }

    #[test]
    fn test_golden_receipt() {
        let (order, customer) = fixture();
        let expected = "\
========================================
        PIZZARIA SABOR DE CASA
========================================
Pedido: ord-1
Data: 30/08/2026 14:05

Cliente: Maria Silva
Telefone: 11 99999-0000
Endereço: Av. Paulista, 1000
Complemento: apto 42

--- Itens ---
Margherita (M) x1 -> Unit: R$ 43.00 | Total: R$ 43.00
  + Borda: Borda de catupiry (R$ 8.00)
  + Adicional: Extra queijo (R$ 5.00)
Guaraná Lata x2 -> Unit: R$ 6.00 | Total: R$ 12.00

Subtotal: R$ 55.00
Taxa de entrega: R$ 8.00
Total: R$ 63.00

Pagamento: Pix | Entrega | Status: aberto
========================================
";
        assert_eq!(format_receipt(&order, &customer), expected);
    }

    #[test]
    fn test_receipt_is_byte_idempotent() {
        let (order, customer) = fixture();
        let first = format_receipt(&order, &customer);
        for _ in 0..10 {
            assert_eq!(format_receipt(&order, &customer), first);
        }
    }

    #[test]
    fn test_pickup_receipt_omits_fee_line() {
        let (mut order, mut customer) = fixture();
        order.fulfillment = FulfillmentType::Pickup;
        order.delivery_fee_cents = 0;
        order.total_cents = order.subtotal_cents;
        customer.complement = None;

        let text = format_receipt(&order, &customer);
        assert!(!text.contains("Taxa de entrega"));
        assert!(!text.contains("Complemento"));
        assert!(text.contains("Retirada"));
        assert!(text.contains("Total: R$ 55.00"));
    }

    #[test]
    fn test_status_label_follows_order() {
        let (mut order, customer) = fixture();
        order.status = OrderStatus::Cancelled;
        let text = format_receipt(&order, &customer);
        assert!(text.contains("Status: cancelado"));
    }
}
