use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use odk_orders::{OrderDirectory, OrderStatus};
use odk_schemas::{OrderDraft, OrderItemSnapshot, OrderSnapshot};

mod ledger;

#[derive(Parser)]
#[command(name = "odk")]
#[command(about = "OrderDesk CLI", long_about = None)]
struct Cli {
    /// Path to the JSON order ledger (created on first write).
    #[arg(long, global = true, default_value = "orders.json")]
    ledger: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Order lifecycle commands
    Order {
        #[command(subcommand)]
        cmd: OrderCmd,
    },
}

#[derive(Subcommand)]
enum OrderCmd {
    /// Create a new order (status starts at Confirmed) and print it.
    Create {
        /// Customer id
        #[arg(long)]
        customer: Uuid,

        /// Shipping address
        #[arg(long)]
        address: String,

        /// Order line as product:qty (repeatable)
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<OrderItemSnapshot>,
    },

    /// Request a status change (Shipped | Cancelled | Receipted | Returned).
    SetStatus {
        /// Order id
        #[arg(long)]
        id: Uuid,

        /// Requested status
        #[arg(long)]
        status: OrderStatus,
    },

    /// Update the shipping address (Confirmed orders only).
    SetAddress {
        /// Order id
        #[arg(long)]
        id: Uuid,

        /// Replacement shipping address
        #[arg(long)]
        address: String,
    },

    /// Print a single order.
    Show {
        /// Order id
        #[arg(long)]
        id: Uuid,
    },

    /// Print all orders, optionally one customer's.
    List {
        /// Restrict to one customer id
        #[arg(long)]
        customer: Option<Uuid>,
    },
}

/// Parse an `--item` argument of the form `product:qty`.
fn parse_item(s: &str) -> Result<OrderItemSnapshot, String> {
    let (product_id, qty) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected product:qty, got {s:?}"))?;
    if product_id.is_empty() {
        return Err(format!("expected product:qty, got {s:?}"));
    }
    let quantity: u32 = qty
        .parse()
        .map_err(|_| format!("quantity in {s:?} is not a number"))?;
    Ok(OrderItemSnapshot {
        product_id: product_id.to_string(),
        quantity,
    })
}

fn print_order(snap: &OrderSnapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(snap)?);
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Commands::Order { cmd } = cli.cmd;
    let mut dir = ledger::load(&cli.ledger)?;
    tracing::debug!(ledger = %cli.ledger.display(), orders = dir.list().count(), "ledger loaded");

    match cmd {
        OrderCmd::Create {
            customer,
            address,
            items,
        } => {
            let draft = OrderDraft {
                customer_id: customer,
                shipping_address: address,
                items,
            };
            let snap = dir.create(draft, Utc::now())?.snapshot();
            ledger::save(&cli.ledger, &dir)?;
            print_order(&snap)?;
        }

        OrderCmd::SetStatus { id, status } => {
            dir.change_status(id, status)?;
            ledger::save(&cli.ledger, &dir)?;
            let snap = require(&dir, id)?;
            print_order(&snap)?;
        }

        OrderCmd::SetAddress { id, address } => {
            dir.update_shipping_address(id, &address)?;
            ledger::save(&cli.ledger, &dir)?;
            let snap = require(&dir, id)?;
            print_order(&snap)?;
        }

        OrderCmd::Show { id } => {
            let snap = require(&dir, id)?;
            print_order(&snap)?;
        }

        OrderCmd::List { customer } => {
            let snaps: Vec<OrderSnapshot> = match customer {
                Some(customer_id) => dir
                    .list_for_customer(customer_id)
                    .map(|o| o.snapshot())
                    .collect(),
                None => dir.snapshots(),
            };
            println!("{}", serde_json::to_string_pretty(&snaps)?);
        }
    }

    Ok(())
}

fn require(dir: &OrderDirectory, id: Uuid) -> Result<OrderSnapshot> {
    dir.get(id)
        .map(|o| o.snapshot())
        .ok_or_else(|| anyhow!("Order is not found"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
