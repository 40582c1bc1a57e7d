//! Storefront commands: browse the menu, manage the cart, sign in.
//!
//! # Usage
//!
//! ```bash
//! chickyen shop products
//! chickyen shop cart add 65f0c2
//! chickyen shop cart checkout
//! chickyen shop login -e priya@example.com -p secret
//! ```
//!
//! # Environment Variables
//!
//! - `CHICKYEN_API_URL` - Backend base URL
//! - `CHICKYEN_STATE_FILE` - Where the cart and session are kept

use std::io::{self, Write};

use chickyen_core::{CustomerDetails, ProductId};
use chickyen_storefront::{Storefront, StorefrontConfig};
use clap::Subcommand;
use secrecy::SecretString;

use super::{Result, render};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List the menu
    Products,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Sign in as a customer
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Register and save delivery details
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,
    },
    /// Sign out and empty the cart
    Logout,
    /// Show who is signed in
    Whoami,
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart panel
    Show,
    /// Add one of a product
    Add { id: String },
    /// Increase a line by one
    Inc { id: String },
    /// Decrease a line by one, removing it at zero
    Dec { id: String },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Hand the cart to checkout
    Checkout,
}

/// Run a storefront command against the configured backend.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the command fails.
pub async fn run(action: ShopAction) -> Result<()> {
    let shop = Storefront::new(StorefrontConfig::from_env()?)?;
    let mut out = io::stdout().lock();

    match action {
        ShopAction::Products => {
            let view = shop.catalog().await?;
            render::catalog(&mut out, &view)?;
        }
        ShopAction::Cart { action } => {
            cart(&shop, &mut out, action.unwrap_or(CartAction::Show)).await?;
        }
        ShopAction::Login { email, password } => {
            let signed_in = shop
                .session()
                .login(&email, &SecretString::from(password))
                .await?;
            render::header(&mut out, &shop.session().header()?)?;
            writeln!(out, "Continue at {}", signed_in.destination)?;
        }
        ShopAction::Signup {
            email,
            password,
            name,
            phone,
            address,
        } => {
            let pending = shop
                .session()
                .signup(&email, SecretString::from(password))
                .await?;
            writeln!(out, "Account created for {}", pending.email())?;
            let signed_in = shop
                .session()
                .complete_signup(
                    pending,
                    CustomerDetails {
                        name,
                        phone,
                        address,
                    },
                )
                .await?;
            render::header(&mut out, &shop.session().header()?)?;
            writeln!(out, "Continue at {}", signed_in.destination)?;
        }
        ShopAction::Logout => {
            let destination = shop.session().logout()?;
            writeln!(out, "Signed out. Continue at {destination}")?;
        }
        ShopAction::Whoami => {
            render::header(&mut out, &shop.session().header()?)?;
        }
    }
    Ok(())
}

async fn cart(shop: &Storefront, out: &mut impl Write, action: CartAction) -> Result<()> {
    let cart = shop.cart();
    let update = match action {
        CartAction::Show => {
            render::cart_panel(out, &cart.panel()?)?;
            return Ok(());
        }
        CartAction::Checkout => {
            let ready = cart.checkout()?;
            writeln!(
                out,
                "Proceeding to checkout with {} item(s): {}",
                ready.item_count, ready.destination
            )?;
            return Ok(());
        }
        CartAction::Add { id } => shop.add_to_cart(&ProductId::new(id)).await?,
        CartAction::Inc { id } => cart.change_quantity(&ProductId::new(id), 1)?,
        CartAction::Dec { id } => cart.change_quantity(&ProductId::new(id), -1)?,
        CartAction::Remove { id } => cart.remove_item(&ProductId::new(id))?,
        CartAction::Clear => cart.clear()?,
    };
    render::cart_update(out, &update)?;
    Ok(())
}
