use clap::{Args, Subcommand};
use platter::{cart::Cart, pricing};
use platter_app::context::AppContext;

use super::{describe, taka};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with totals
    Show,

    /// Add a product
    Add {
        /// Product id from `menu list`
        product_id: String,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove a product
    Remove { product_id: String },

    /// Set a product's quantity; zero or less removes it
    Set {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    let cart = match command.command {
        CartSubcommand::Show => ctx.carts.get_cart().await,
        CartSubcommand::Add {
            product_id,
            quantity,
        } => {
            let product = ctx
                .catalog
                .find(&product_id)
                .cloned()
                .ok_or_else(|| format!("unknown product {product_id}"))?;

            ctx.carts
                .add_to_cart(product, quantity)
                .await
                .map_err(|error| format!("failed to add to cart: {}", describe(&error)))?
        }
        CartSubcommand::Remove { product_id } => ctx
            .carts
            .remove_from_cart(&product_id)
            .await
            .map_err(|error| format!("failed to remove from cart: {}", describe(&error)))?,
        CartSubcommand::Set {
            product_id,
            quantity,
        } => ctx
            .carts
            .update_quantity(&product_id, quantity)
            .await
            .map_err(|error| format!("failed to update cart: {}", describe(&error)))?,
        CartSubcommand::Clear => ctx
            .carts
            .clear_cart()
            .await
            .map_err(|error| format!("failed to clear cart: {}", describe(&error)))?,
    };

    print_cart(&cart);

    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("your cart is empty");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:<4} {:<24} x{:<3} {:>10}",
            line.product.id,
            line.product.name,
            line.quantity,
            taka(line.subtotal())
        );
    }

    println!();
    println!("items: {}", cart.item_count());
    println!("subtotal: {}", taka(cart.total()));
    println!("delivery_fee: {}", taka(pricing::DELIVERY_FEE));
    println!("total: {}", taka(pricing::grand_total(cart.total())));
}
