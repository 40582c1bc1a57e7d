//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! chickyen admin login -e owner@example.com -p secret
//! chickyen admin orders --status pending
//! chickyen admin advance 65f0c2 verified
//! chickyen admin staff add --name Ravi --email ravi@example.com --password hunter2
//! ```
//!
//! # Environment Variables
//!
//! - `CHICKYEN_ADMIN_API_URL` - Backend base URL (falls back to `CHICKYEN_API_URL`)
//! - `CHICKYEN_ADMIN_STATE_FILE` - Where the staff session is kept

use std::io::{self, Write};
use std::sync::Arc;

use chickyen_admin::orders::update_failed_message;
use chickyen_admin::views::{
    CLEAR_LOGS_PROMPT, CustomerFilter, DELETE_LOCATION_PROMPT, DELETE_PRODUCT_PROMPT,
    DELETE_STAFF_PROMPT, OrderFilter,
};
use chickyen_admin::{AdminClient, AdminConfig, AdminConsole, EditMode, StaffForm};
use chickyen_core::{
    FileStore, LocationId, LocationInput, OrderId, OrderStatus, Price, ProductId, ProductInput,
    SharedStore, StaffId, StaffRole,
};
use chrono::Local;
use clap::Subcommand;
use rust_decimal::Decimal;
use secrecy::SecretString;

use super::{CliError, Result, confirm, render};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Sign in as staff
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the staff session
    Logout,
    /// Show the orders board
    Orders {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Match order id or customer name
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Move an order to a new status
    Advance {
        id: String,
        status: OrderStatus,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the invoice link of a delivered order
    Invoice { id: String },
    /// Manage the menu
    Products {
        #[command(subcommand)]
        action: Option<ProductAction>,
    },
    /// List products running low
    LowStock,
    /// Customer insights
    Customers {
        /// all, top, repeat or one-time
        #[arg(short, long, default_value = "all")]
        filter: CustomerFilter,

        #[arg(long, default_value = "")]
        search: String,
    },
    /// Sales dashboard
    Sales,
    /// Manage pickup points
    Locations {
        #[command(subcommand)]
        action: Option<LocationAction>,
    },
    /// Manage staff accounts (owner only)
    Staff {
        #[command(subcommand)]
        action: Option<StaffAction>,
    },
    /// Activity history
    Logs {
        #[command(subcommand)]
        action: Option<LogsAction>,
    },
}

#[derive(Subcommand)]
pub enum ProductAction {
    List,
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value = "")]
        weight: String,

        #[arg(long, default_value_t = 0)]
        spice: u32,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        image: String,

        #[arg(long)]
        stock: i64,
    },
    /// Change the given fields, keeping the rest
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        weight: Option<String>,

        #[arg(long)]
        spice: Option<u32>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        stock: Option<i64>,
    },
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LocationAction {
    List,
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value = "")]
        maps_link: String,
    },
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum StaffAction {
    List,
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "admin")]
        role: StaffRole,

        #[arg(long)]
        password: String,
    },
    /// Change the given fields of a non-owner account
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<StaffRole>,
    },
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LogsAction {
    List,
    /// Erase the history (owner only)
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
}

/// Run an admin command against the configured backend.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the session is refused, or
/// the command fails.
pub async fn run(action: AdminAction) -> Result<()> {
    let config = AdminConfig::from_env()?;
    let store: SharedStore = Arc::new(FileStore::new(config.state_file.clone()));
    let client = AdminClient::new(&config)?;
    let mut out = io::stdout().lock();

    match action {
        AdminAction::Login { email, password } => {
            let session =
                chickyen_admin::sign_in(&client, &store, &email, &SecretString::from(password))
                    .await?;
            writeln!(
                out,
                "Signed in as {} ({})",
                session.user().display_name(),
                session.role()
            )?;
            return Ok(());
        }
        AdminAction::Logout => {
            let destination = chickyen_admin::sign_out(&store)?;
            writeln!(out, "Signed out. Continue at {destination}")?;
            return Ok(());
        }
        _ => {}
    }

    let mut console = AdminConsole::open(client, store)?;
    match action {
        AdminAction::Login { .. } | AdminAction::Logout => {}
        AdminAction::Orders { status, search } => {
            let filter = OrderFilter { status, search };
            if filter == OrderFilter::default() {
                let landing = console.landing(&Local::now()).await?;
                render::orders_board(&mut out, &landing.board)?;
                if let Some(alert) = &landing.low_stock {
                    writeln!(out)?;
                    render::low_stock(&mut out, alert)?;
                }
            } else {
                let board = console.orders_board(&filter, &Local::now()).await?;
                render::orders_board(&mut out, &board)?;
            }
        }
        AdminAction::Advance { id, status, yes } => {
            advance(&mut console, &mut out, &OrderId::new(id), status, yes).await?;
        }
        AdminAction::Invoice { id } => {
            console.orders_board(&OrderFilter::default(), &Local::now()).await?;
            let url = console.invoice_url(&OrderId::new(id))?;
            writeln!(out, "{url}")?;
        }
        AdminAction::Products { action } => {
            products(&mut console, &mut out, action.unwrap_or(ProductAction::List)).await?;
        }
        AdminAction::LowStock => match console.check_low_stock().await? {
            Some(alert) => render::low_stock(&mut out, &alert)?,
            None => writeln!(out, "Stock levels look fine")?,
        },
        AdminAction::Customers { filter, search } => {
            let view = console.customers_screen(filter, &search).await?;
            render::customers(&mut out, &view)?;
        }
        AdminAction::Sales => {
            let view = console.sales_screen(&Local::now()).await?;
            render::sales(&mut out, &view)?;
        }
        AdminAction::Locations { action } => {
            locations(&mut console, &mut out, action.unwrap_or(LocationAction::List)).await?;
        }
        AdminAction::Staff { action } => {
            staff(&mut console, &mut out, action.unwrap_or(StaffAction::List)).await?;
        }
        AdminAction::Logs { action } => {
            let view = match action.unwrap_or(LogsAction::List) {
                LogsAction::List => console.logs_screen(&Local).await?,
                LogsAction::Clear { yes } => {
                    if !yes && !confirm("Clear logs", CLEAR_LOGS_PROMPT)? {
                        return Ok(());
                    }
                    console.clear_logs(&Local).await?
                }
            };
            render::logs(&mut out, &view)?;
        }
    }
    Ok(())
}

async fn advance(
    console: &mut AdminConsole,
    out: &mut impl Write,
    id: &OrderId,
    status: OrderStatus,
    yes: bool,
) -> Result<()> {
    console.orders_board(&OrderFilter::default(), &Local::now()).await?;
    let pending = console.request_status_change(id, status)?;

    if !yes && !confirm(pending.prompt.title, pending.prompt.message)? {
        pending.cancel();
        writeln!(out, "Left unchanged")?;
        return Ok(());
    }

    let reference = pending.reference.clone();
    match console.confirm(pending).await {
        Ok(changed) => {
            writeln!(out, "Order #{reference} is now {}", changed.status)?;
            if let Some(alert) = &changed.low_stock {
                writeln!(out)?;
                render::low_stock(out, alert)?;
            }
            Ok(())
        }
        Err(err) if err.needs_login() => Err(err.into()),
        Err(err) => {
            err.report();
            Err(CliError::UpdateFailed(update_failed_message(&err)))
        }
    }
}

async fn products(
    console: &mut AdminConsole,
    out: &mut impl Write,
    action: ProductAction,
) -> Result<()> {
    let view = match action {
        ProductAction::List => console.products_screen().await?,
        ProductAction::Add {
            name,
            price,
            weight,
            spice,
            description,
            image,
            stock,
        } => {
            let input = ProductInput {
                name,
                price: Price::new(price),
                weight,
                spice_level: spice,
                description,
                image,
                stock,
            };
            console.save_product(EditMode::Create, input).await?
        }
        ProductAction::Update {
            id,
            name,
            price,
            weight,
            spice,
            description,
            image,
            stock,
        } => {
            let (mode, mut input) = console.edit_product(&ProductId::new(id)).await?;
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(price) = price {
                input.price = Price::new(price);
            }
            if let Some(weight) = weight {
                input.weight = weight;
            }
            if let Some(spice) = spice {
                input.spice_level = spice;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(image) = image {
                input.image = image;
            }
            if let Some(stock) = stock {
                input.stock = stock;
            }
            console.save_product(mode, input).await?
        }
        ProductAction::Delete { id, yes } => {
            if !yes && !confirm("Delete product", DELETE_PRODUCT_PROMPT)? {
                return Ok(());
            }
            console.delete_product(&ProductId::new(id)).await?
        }
    };
    render::products(out, &view)?;
    Ok(())
}

async fn locations(
    console: &mut AdminConsole,
    out: &mut impl Write,
    action: LocationAction,
) -> Result<()> {
    let view = match action {
        LocationAction::List => console.locations_screen().await?,
        LocationAction::Add {
            name,
            address,
            maps_link,
        } => {
            console
                .add_location(LocationInput {
                    name,
                    address,
                    google_maps_link: maps_link,
                })
                .await?
        }
        LocationAction::Delete { id, yes } => {
            if !yes && !confirm("Remove location", DELETE_LOCATION_PROMPT)? {
                return Ok(());
            }
            console.delete_location(&LocationId::new(id)).await?
        }
    };
    render::locations(out, &view)?;
    Ok(())
}

async fn staff(console: &mut AdminConsole, out: &mut impl Write, action: StaffAction) -> Result<()> {
    let view = match action {
        StaffAction::List => console.staff_screen().await?,
        StaffAction::Add {
            name,
            email,
            role,
            password,
        } => {
            let form = StaffForm {
                name,
                email,
                role,
                password: Some(SecretString::from(password)),
            };
            console.save_staff(EditMode::Create, form).await?
        }
        StaffAction::Update {
            id,
            name,
            email,
            role,
        } => {
            let (mode, mut form) = console.edit_staff(&StaffId::new(id)).await?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(role) = role {
                form.role = role;
            }
            console.save_staff(mode, form).await?
        }
        StaffAction::Delete { id, yes } => {
            if !yes && !confirm("Remove staff", DELETE_STAFF_PROMPT)? {
                return Ok(());
            }
            console.delete_staff(&StaffId::new(id)).await?
        }
    };
    render::staff(out, &view)?;
    Ok(())
}
