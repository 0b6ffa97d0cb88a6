//! `pizzaria product` subcommands.
//!
//! Prices are taken as decimal strings (`30`, `30.50`, `30,50`) and
//! parsed into cents without ever touching a float.

use anyhow::Result;
use clap::Subcommand;

use pizzaria_core::{Money, PizzaSize, ProductCategory, ProductPricing};
use pizzaria_db::Database;

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// Add a pizza with its P/M/G price schedule
    AddPizza {
        #[arg(long)]
        name: String,
        /// Price for size P, e.g. 25.00
        #[arg(long)]
        price_p: String,
        /// Price for size M, e.g. 30.00
        #[arg(long)]
        price_m: String,
        /// Price for size G, e.g. 38.00
        #[arg(long)]
        price_g: String,
    },
    /// Add a flat-priced product (drink, dessert, extra, crust, other)
    Add {
        #[arg(long)]
        name: String,
        /// One of: drink, dessert, extra, crust, other
        #[arg(long)]
        category: String,
        /// Price, e.g. 6.00
        #[arg(long)]
        price: String,
    },
    /// List the menu, optionally one category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a product (live orders are re-priced, history keeps its snapshots)
    Delete { id: String },
}

pub async fn run(db: &Database, action: ProductAction) -> Result<()> {
    match action {
        ProductAction::AddPizza {
            name,
            price_p,
            price_m,
            price_g,
        } => {
            let pricing = ProductPricing::Sized {
                p_cents: Money::parse_decimal(&price_p)?.cents(),
                m_cents: Money::parse_decimal(&price_m)?.cents(),
                g_cents: Money::parse_decimal(&price_g)?.cents(),
            };
            let product = db
                .products()
                .insert(&name, ProductCategory::Pizza, pricing)
                .await?;
            println!("Pizza created: {} ({})", product.name, product.id);
        }
        ProductAction::Add {
            name,
            category,
            price,
        } => {
            let category = ProductCategory::parse(&category)?;
            let pricing = ProductPricing::Flat {
                price_cents: Money::parse_decimal(&price)?.cents(),
            };
            let product = db.products().insert(&name, category, pricing).await?;
            println!(
                "Product created: {} [{}] ({})",
                product.name,
                product.category.as_str(),
                product.id
            );
        }
        ProductAction::List { category } => {
            let filter = category.as_deref().map(ProductCategory::parse).transpose()?;
            let products = db.products().list(filter).await?;
            if products.is_empty() {
                println!("No products on the menu.");
                return Ok(());
            }
            for p in products {
                let prices = match &p.pricing {
                    ProductPricing::Flat { price_cents } => {
                        format!("{}", Money::from_cents(*price_cents))
                    }
                    ProductPricing::Sized { .. } => {
                        // Constructors guarantee all three tiers exist on a pizza
                        let tier = |s| {
                            p.tier_price(s)
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| "-".to_string())
                        };
                        format!(
                            "P {} | M {} | G {}",
                            tier(PizzaSize::P),
                            tier(PizzaSize::M),
                            tier(PizzaSize::G)
                        )
                    }
                };
                println!("{}  {}  [{}]  {}", p.id, p.name, p.category.as_str(), prices);
            }
        }
        ProductAction::Delete { id } => {
            super::check_id("product id", &id)?;
            db.products().delete(&id).await?;
            println!("Product deleted: {id}");
        }
    }
    Ok(())
}
