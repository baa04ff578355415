//! Cart commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use sungrove_client::{ClientError, ClientSession, StorefrontApi};
use sungrove_core::{CurrencyCode, Price, Product, ProductId};

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a product to the cart (merges with an existing line)
    Add {
        /// Catalog product ID
        #[arg(long)]
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 18.00
        #[arg(long)]
        price: Decimal,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity exactly (0 removes it)
    Update {
        /// Catalog product ID
        #[arg(long)]
        id: String,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Catalog product ID
        #[arg(long)]
        id: String,
    },
    /// Print the cart lines and totals
    Show,
    /// Empty the cart
    Clear,
}

/// Run a cart command.
///
/// # Errors
///
/// Returns the core's `ClientError` when the operation is invalid.
pub fn run<A: StorefrontApi>(
    session: &mut ClientSession<A>,
    action: &CartAction,
) -> Result<(), ClientError> {
    match action {
        CartAction::Add {
            id,
            name,
            price,
            image,
            quantity,
        } => {
            let product = Product {
                id: ProductId::new(id.clone()),
                name: name.clone(),
                price: Price::new(*price, CurrencyCode::USD),
                image: image.clone(),
            };
            let line = session.cart_mut().add_item(&product, *quantity)?;
            println!("{} × {} in cart.", line.quantity, line.name);
        }
        CartAction::Update { id, quantity } => {
            session
                .cart_mut()
                .update_quantity(&ProductId::new(id.clone()), *quantity)?;
            println!("Updated.");
        }
        CartAction::Remove { id } => {
            session.cart_mut().remove_item(&ProductId::new(id.clone()));
            println!("Removed.");
        }
        CartAction::Show => show(session),
        CartAction::Clear => {
            session.cart_mut().clear();
            println!("Cart emptied.");
        }
    }
    Ok(())
}

fn show<A: StorefrontApi>(session: &ClientSession<A>) {
    let cart = session.cart();
    if cart.lines().is_empty() {
        println!("Cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:>3} × {:<30} {:>10} each  {:>10}",
            line.quantity,
            line.name,
            line.price.to_string(),
            line.line_total().to_string(),
        );
    }

    let totals = cart.totals();
    println!("---");
    println!("{} items, subtotal {}", totals.item_count, totals.subtotal);
}
