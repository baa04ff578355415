//! Wishlist commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use sungrove_client::{ClientError, ClientSession, StorefrontApi};
use sungrove_core::{CurrencyCode, Price, Product, ProductId};

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Add the product if absent, remove it if present
    Toggle {
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
    },
    /// Print the wishlist
    Show,
}

/// Run a wishlist command.
///
/// # Errors
///
/// Returns the core's `ClientError` when the operation is invalid.
pub fn run<A: StorefrontApi>(
    session: &mut ClientSession<A>,
    action: &WishlistAction,
) -> Result<(), ClientError> {
    match action {
        WishlistAction::Toggle {
            id,
            name,
            price,
            image,
        } => {
            let product = Product {
                id: ProductId::new(id.clone()),
                name: name.clone(),
                price: Price::new(*price, CurrencyCode::USD),
                image: image.clone(),
            };
            if session.wishlist_mut().toggle(&product) {
                println!("Added {name} to the wishlist.");
            } else {
                println!("Removed {name} from the wishlist.");
            }
        }
        WishlistAction::Show => {
            let wishlist = session.wishlist();
            if wishlist.entries().is_empty() {
                println!("Wishlist is empty.");
            } else {
                for entry in wishlist.entries() {
                    println!("{:<30} {:>10}", entry.name, entry.price.to_string());
                }
            }
        }
    }
    Ok(())
}
