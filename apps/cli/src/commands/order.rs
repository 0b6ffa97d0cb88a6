//! `pizzaria order` subcommands.
//!
//! `create` runs the whole checkout: parse item specs, price against the
//! current catalog, persist, then write the receipt file. Every other
//! action works off the stored order.

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::item_spec::parse_item_spec;
use crate::receipts::write_receipt;
use pizzaria_core::{CartLine, FulfillmentType, Order, OrderStatus, PaymentMethod};
use pizzaria_db::Database;

#[derive(Debug, Subcommand)]
pub enum OrderAction {
    /// Take a new order and write its receipt
    Create {
        /// Customer id
        #[arg(long)]
        customer: String,
        /// One of: cash, card, pix
        #[arg(long)]
        payment: String,
        /// One of: delivery, pickup
        #[arg(long)]
        fulfillment: String,
        /// Item spec, repeatable:
        /// product=<id>,qty=<n>[,size=P|M|G][,crust=<id>][,extras=<id>+<id>]
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// List all orders, newest first
    List,
    /// Show one order in full
    Show { id: String },
    /// Show one customer's order history
    History {
        /// Customer id
        customer: String,
    },
    /// Move an order one step forward (open → preparing → ready → delivered)
    Advance { id: String },
    /// Move an order to an explicit status (next step or cancelled)
    SetStatus {
        id: String,
        /// One of: open, preparing, ready, delivered, cancelled
        status: String,
    },
    /// Cancel an order
    Cancel { id: String },
    /// Delete an order outright
    Delete { id: String },
    /// Regenerate the receipt file for an order
    Receipt { id: String },
}

pub async fn run(db: &Database, receipts_dir: &Path, action: OrderAction) -> Result<()> {
    match action {
        OrderAction::Create {
            customer,
            payment,
            fulfillment,
            items,
        } => {
            super::check_id("customer id", &customer)?;
            let payment = PaymentMethod::parse(&payment)?;
            let fulfillment = FulfillmentType::parse(&fulfillment)?;
            let cart: Vec<CartLine> = items
                .iter()
                .map(|spec| parse_item_spec(spec))
                .collect::<Result<_, _>>()?;

            let order = db
                .orders()
                .create(&customer, &cart, payment, fulfillment)
                .await?;
            let customer = db.customers().get_by_id(&order.customer_id).await?;
            let path = write_receipt(receipts_dir, &order, &customer)?;

            print_order(&order);
            println!("Receipt: {}", path.display());
        }
        OrderAction::List => {
            let orders = db.orders().list().await?;
            if orders.is_empty() {
                println!("No orders.");
                return Ok(());
            }
            for o in orders {
                println!(
                    "{}  {}  {}  {}  {}  {}",
                    o.id,
                    o.customer_name,
                    pizzaria_core::Money::from_cents(o.total_cents),
                    o.payment.label(),
                    o.fulfillment.label(),
                    o.status.label(),
                );
            }
        }
        OrderAction::Show { id } => {
            super::check_id("order id", &id)?;
            let order = db.orders().get_by_id(&id).await?;
            print_order(&order);
        }
        OrderAction::History { customer } => {
            super::check_id("customer id", &customer)?;
            let orders = db.orders().list_for_customer(&customer).await?;
            if orders.is_empty() {
                println!("No orders for customer {customer}.");
                return Ok(());
            }
            for o in orders {
                println!(
                    "{}  {}  {}  {}",
                    o.id,
                    o.created_at.format("%d/%m/%Y %H:%M"),
                    pizzaria_core::Money::from_cents(o.total_cents),
                    o.status.label(),
                );
            }
        }
        OrderAction::Advance { id } => {
            super::check_id("order id", &id)?;
            let order = db.orders().advance(&id).await?;
            println!("Order {} is now {}", order.id, order.status.label());
        }
        OrderAction::SetStatus { id, status } => {
            super::check_id("order id", &id)?;
            let requested = OrderStatus::parse(&status)?;
            let order = db.orders().update_status(&id, requested).await?;
            println!("Order {} is now {}", order.id, order.status.label());
        }
        OrderAction::Cancel { id } => {
            super::check_id("order id", &id)?;
            let order = db.orders().cancel(&id).await?;
            println!("Order {} cancelled", order.id);
        }
        OrderAction::Delete { id } => {
            super::check_id("order id", &id)?;
            db.orders().delete(&id).await?;
            println!("Order deleted: {id}");
        }
        OrderAction::Receipt { id } => {
            super::check_id("order id", &id)?;
            let order = db.orders().get_by_id(&id).await?;
            let customer = db.customers().get_by_id(&order.customer_id).await?;
            let path = write_receipt(receipts_dir, &order, &customer)?;
            println!("Receipt: {}", path.display());
        }
    }
    Ok(())
}

fn print_order(order: &Order) {
    println!("Order {}  [{}]", order.id, order.status.label());
    for item in &order.items {
        let size = item
            .size
            .map(|s| format!(" ({})", s.label()))
            .unwrap_or_default();
        println!(
            "  {}{} x{}  {} each  = {}",
            item.name_snapshot,
            size,
            item.quantity,
            item.unit_price(),
            item.line_total(),
        );
        if let Some(crust) = &item.crust {
            println!("    + {} ({})", crust.name, crust.price());
        }
        for extra in &item.extras {
            println!("    + {} ({})", extra.name, extra.price());
        }
    }
    println!("  Subtotal: {}", order.subtotal());
    if order.delivery_fee().is_positive() {
        println!("  Delivery: {}", order.delivery_fee());
    }
    println!(
        "  Total: {}  ({}, {})",
        order.total(),
        order.payment.label(),
        order.fulfillment.label(),
    );
}
