use clap::Args;
use platter::{orders::PaymentMethod, validation::CheckoutDetails};
use platter_app::context::AppContext;

use super::{describe, orders::print_order, taka};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name; defaults to the signed-in user's name
    #[arg(long)]
    name: Option<String>,

    /// Recipient phone; defaults to the signed-in user's phone
    #[arg(long)]
    phone: Option<String>,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Payment method (cash, bkash, nagad)
    #[arg(long, default_value = "cash")]
    payment: PaymentMethod,

    /// Wallet transaction id, required for bkash and nagad
    #[arg(long)]
    transaction_id: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let session = ctx.sessions.current().await;

    let details = CheckoutDetails {
        customer_name: args
            .name
            .or_else(|| session.as_ref().map(|session| session.name.clone()))
            .unwrap_or_default(),
        customer_phone: args
            .phone
            .or_else(|| session.as_ref().map(|session| session.phone.clone()))
            .unwrap_or_default(),
        delivery_address: args.address,
        payment_method: args.payment,
        transaction_id: args.transaction_id,
    };

    let order = ctx
        .checkout
        .place_order(details)
        .await
        .map_err(|error| format!("checkout failed: {}", describe(&error)))?;

    println!("order placed");
    print_order(&order);
    println!("amount_due: {}", taka(order.grand_total()));

    Ok(())
}
