use std::error::Error;

use clap::{Parser, Subcommand};
use platter::pricing;
use platter_app::{
    config::{AppConfig, LoggingConfig},
    context::AppContext,
};

mod auth;
mod cart;
mod checkout;
mod menu;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "platter", about = "Platter food ordering CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    app: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Menu(menu::MenuCommand),
    Cart(cart::CartCommand),
    Checkout(checkout::CheckoutArgs),
    Orders(orders::OrdersCommand),
    Auth(auth::AuthCommand),
}

impl Cli {
    /// Parse arguments, reading a `.env` file first if there is one.
    pub(crate) fn load() -> Self {
        _ = dotenvy::dotenv();

        Self::parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_config(&self.app)
            .await
            .map_err(|error| format!("failed to start: {}", describe(&error)))?;

        let result = match self.command {
            Commands::Menu(command) => menu::run(&ctx, command),
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Checkout(args) => checkout::run(&ctx, args).await,
            Commands::Orders(command) => orders::run(&ctx, command).await,
            Commands::Auth(command) => auth::run(&ctx, command).await,
        };

        ctx.flush().await;

        result
    }
}

/// Whole taka amount formatted as money.
fn taka(amount: u64) -> String {
    pricing::to_money(amount).map_or_else(|_| format!("{amount} BDT"), |money| money.to_string())
}

/// `error` followed by each of its sources, separated by `": "`.
fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use platter_app::{context::AppInitError, storage::StorageError};

    use super::*;

    #[test]
    fn describe_includes_every_source() {
        let error = AppInitError::Database(StorageError::Sql(sqlx::Error::PoolTimedOut));

        assert_eq!(
            describe(&error),
            format!(
                "failed to open database: storage error: {}",
                sqlx::Error::PoolTimedOut
            )
        );
    }
}
