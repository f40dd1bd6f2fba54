use std::io;

use clap::{Args, Subcommand};
use jiff::tz::TimeZone;
use platter::{
    invoice::Invoice,
    orders::{Order, OrderStatus},
};
use platter_app::context::AppContext;

use super::{describe, taka};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List,

    /// Show one order with its status history
    Show { order_id: String },

    /// Move an order to a new status
    Status {
        order_id: String,

        /// received, preparing, on-the-way, delivered or cancelled
        status: OrderStatus,
    },

    /// Print an order's invoice
    Invoice { order_id: String },
}

pub(crate) async fn run(ctx: &AppContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => {
            let orders = ctx.orders.list_orders().await;

            if orders.is_empty() {
                println!("no orders yet");
                return Ok(());
            }

            for order in orders {
                println!(
                    "{}  {}  {:<14} {:>3} items  {:>10}",
                    order.id,
                    order.created_at.strftime("%Y-%m-%d %H:%M"),
                    order.status.label(),
                    order.items.iter().map(|line| u64::from(line.quantity)).sum::<u64>(),
                    taka(order.grand_total())
                );
            }
        }
        OrdersSubcommand::Show { order_id } => {
            let order = find(ctx, &order_id).await?;

            print_order(&order);

            for (step, reached) in order.progress() {
                match reached {
                    Some(at) => println!("progress: [x] {} {at}", step.label()),
                    None => println!("progress: [ ] {}", step.label()),
                }
            }

            for change in &order.status_history {
                println!("history: {} {}", change.timestamp, change.status.label());
            }
        }
        OrdersSubcommand::Status { order_id, status } => {
            let order = ctx
                .orders
                .update_order_status(&order_id, status)
                .await
                .map_err(|error| format!("failed to update order: {}", describe(&error)))?
                .ok_or_else(|| format!("order {order_id} not found"))?;

            print_order(&order);
        }
        OrdersSubcommand::Invoice { order_id } => {
            let order = find(ctx, &order_id).await?;

            Invoice::from_order(&order)
                .and_then(|invoice| invoice.write_to(io::stdout().lock(), &TimeZone::system()))
                .map_err(|error| format!("failed to render invoice: {}", describe(&error)))?;
        }
    }

    Ok(())
}

async fn find(ctx: &AppContext, order_id: &str) -> Result<Order, String> {
    ctx.orders
        .get_order(order_id)
        .await
        .ok_or_else(|| format!("order {order_id} not found"))
}

pub(super) fn print_order(order: &Order) {
    println!("order_id: {}", order.id);
    println!("status: {}", order.status.label());
    println!("created_at: {}", order.created_at);
    println!("customer: {} ({})", order.customer_name, order.customer_phone);
    println!("address: {}", order.delivery_address);
    println!("payment: {}", order.payment_method.label());

    if let Some(transaction_id) = &order.transaction_id {
        println!("transaction_id: {transaction_id}");
    }

    for line in &order.items {
        println!(
            "item: {} x{} {}",
            line.product.name,
            line.quantity,
            taka(line.subtotal())
        );
    }

    println!("subtotal: {}", taka(order.total_amount));
}
