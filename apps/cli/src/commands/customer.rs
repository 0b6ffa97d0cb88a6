//! `pizzaria customer` subcommands.

use anyhow::Result;
use clap::Subcommand;

use pizzaria_db::{CustomerInput, Database};

#[derive(Debug, Subcommand)]
pub enum CustomerAction {
    /// Register a new customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Postal code (CEP); drives the delivery-fee tier
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        complement: Option<String>,
    },
    /// List all customers
    List,
    /// Edit an existing customer
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        complement: Option<String>,
    },
    /// Delete a customer (refused while they have orders in progress)
    Delete { id: String },
}

pub async fn run(db: &Database, action: CustomerAction) -> Result<()> {
    match action {
        CustomerAction::Add {
            name,
            phone,
            postal_code,
            address,
            complement,
        } => {
            let customer = db
                .customers()
                .insert(CustomerInput {
                    name,
                    phone,
                    postal_code,
                    address,
                    complement,
                })
                .await?;
            println!("Customer created: {} ({})", customer.name, customer.id);
        }
        CustomerAction::List => {
            let customers = db.customers().list().await?;
            if customers.is_empty() {
                println!("No customers registered.");
                return Ok(());
            }
            for c in customers {
                println!(
                    "{}  {}  {}  {} {}",
                    c.id, c.name, c.phone, c.postal_code, c.address
                );
            }
        }
        CustomerAction::Update {
            id,
            name,
            phone,
            postal_code,
            address,
            complement,
        } => {
            super::check_id("customer id", &id)?;
            let customer = db
                .customers()
                .update(
                    &id,
                    CustomerInput {
                        name,
                        phone,
                        postal_code,
                        address,
                        complement,
                    },
                )
                .await?;
            println!("Customer updated: {} ({})", customer.name, customer.id);
        }
        CustomerAction::Delete { id } => {
            super::check_id("customer id", &id)?;
            db.customers().delete(&id).await?;
            println!("Customer deleted: {id}");
        }
    }
    Ok(())
}
