use clap::{Args, Subcommand};
use platter::products::Product;
use platter_app::context::AppContext;

use super::taka;

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
enum MenuSubcommand {
    /// List products, optionally filtered
    List(ListArgs),

    /// List popular products
    Popular,

    /// List categories
    Categories,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Category name; "All" lists every category
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    search: String,
}

pub(crate) fn run(ctx: &AppContext, command: MenuCommand) -> Result<(), String> {
    match command.command {
        MenuSubcommand::List(args) => {
            let category = args
                .category
                .as_deref()
                .filter(|category| !category.eq_ignore_ascii_case("all"));

            let products: Vec<&Product> = ctx.catalog.filter(category, &args.search).collect();

            if products.is_empty() {
                println!("no products found");
                return Ok(());
            }

            products.into_iter().for_each(print_product);
        }
        MenuSubcommand::Popular => ctx.catalog.popular().for_each(print_product),
        MenuSubcommand::Categories => {
            for category in ctx.catalog.categories() {
                println!("{:<4} {}", category.id, category.name);
            }
        }
    }

    Ok(())
}

fn print_product(product: &Product) {
    println!(
        "{:<4} {:<24} {:<10} {:>10}",
        product.id,
        product.name,
        product.category,
        taka(product.price)
    );
}
