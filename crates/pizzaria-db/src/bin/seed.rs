//! # Seed Data Generator
//!
//! Populates the database with the house menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p pizzaria-db --bin seed
//!
//! # Specify database path
//! cargo run -p pizzaria-db --bin seed -- --db ./pizzaria_dev.db
//! ```
//!
//! ## Generated Data
//! - Pizzas with full P/M/G price schedules
//! - Stuffed crust options (bordas)
//! - Extras (adicionais)
//! - Drinks and desserts
//! - One sample customer

use std::env;

use pizzaria_db::{CustomerInput, Database, DbConfig};
use pizzaria_core::{ProductCategory, ProductPricing};

/// Pizzas: (name, P, M, G) in cents.
const PIZZAS: &[(&str, i64, i64, i64)] = &[
    ("Margherita", 2500, 3000, 3800),
    ("Calabresa", 2800, 3400, 4200),
    ("Portuguesa", 3000, 3600, 4500),
    ("Quatro Queijos", 3200, 3900, 4800),
    ("Frango com Catupiry", 3100, 3700, 4600),
    ("Napolitana", 2700, 3300, 4100),
];

/// Crust options: (name, price cents).
const CRUSTS: &[(&str, i64)] = &[
    ("Borda de catupiry", 800),
    ("Borda de cheddar", 800),
    ("Borda de chocolate", 1000),
];

/// Extras: (name, price cents).
const EXTRAS: &[(&str, i64)] = &[
    ("Extra queijo", 500),
    ("Bacon", 700),
    ("Azeitona", 300),
    ("Catupiry", 600),
];

/// Drinks: (name, price cents).
const DRINKS: &[(&str, i64)] = &[
    ("Guaraná Lata", 600),
    ("Guaraná 2L", 1200),
    ("Coca-Cola Lata", 650),
    ("Coca-Cola 2L", 1300),
    ("Água Mineral", 400),
];

/// Desserts: (name, price cents).
const DESSERTS: &[(&str, i64)] = &[("Pudim", 900), ("Petit Gateau", 1500)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pizzaria_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pizzaria Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pizzaria_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Seeding menu into {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let products = db.products();

    for (name, p, m, g) in PIZZAS {
        products
            .insert(
                name,
                ProductCategory::Pizza,
                ProductPricing::Sized {
                    p_cents: *p,
                    m_cents: *m,
                    g_cents: *g,
                },
            )
            .await?;
    }
    for (name, price) in CRUSTS {
        products
            .insert(
                name,
                ProductCategory::Crust,
                ProductPricing::Flat {
                    price_cents: *price,
                },
            )
            .await?;
    }
    for (name, price) in EXTRAS {
        products
            .insert(
                name,
                ProductCategory::Extra,
                ProductPricing::Flat {
                    price_cents: *price,
                },
            )
            .await?;
    }
    for (name, price) in DRINKS {
        products
            .insert(
                name,
                ProductCategory::Drink,
                ProductPricing::Flat {
                    price_cents: *price,
                },
            )
            .await?;
    }
    for (name, price) in DESSERTS {
        products
            .insert(
                name,
                ProductCategory::Dessert,
                ProductPricing::Flat {
                    price_cents: *price,
                },
            )
            .await?;
    }

    let customer = db
        .customers()
        .insert(CustomerInput {
            name: "Maria Silva".into(),
            phone: "11 99999-0000".into(),
            postal_code: "01310-100".into(),
            address: "Av. Paulista, 1000".into(),
            complement: Some("apto 42".into()),
        })
        .await?;

    let total = PIZZAS.len() + CRUSTS.len() + EXTRAS.len() + DRINKS.len() + DESSERTS.len();
    println!("Seeded {total} products and customer {} ({})", customer.name, customer.id);

    db.close().await;
    Ok(())
}
