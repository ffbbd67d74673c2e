//! QuickCart CLI - offline tools over the storefront's snapshot store.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! qc-cli catalog list --category fruits-vegetables --sort price-low-high
//! qc-cli catalog search milk
//!
//! # Work with the persisted cart
//! qc-cli cart add p1 -q 2
//! qc-cli cart show
//!
//! # Pick a delivery location
//! qc-cli location select 2
//!
//! # Recurring orders need a signed-in user
//! qc-cli account login -e jane@example.com
//! qc-cli recurring add p3 --frequency weekly --time 07:30
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and search products
//! - `cart` - Inspect and edit the cart
//! - `location` - Search and select delivery locations
//! - `account` - Mock login and logout
//! - `recurring` - Manage recurring order items
//!
//! Every command reads and writes the same `--data-dir` the storefront
//! server uses (`STOREFRONT_DATA_DIR`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quickcart_core::{DeliveryTime, Frequency};
use quickcart_storefront::catalog::SortOrder;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "qc-cli")]
#[command(author, version, about = "QuickCart CLI tools")]
struct Cli {
    /// Directory holding the persisted snapshots
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = ".quickcart")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Search and select delivery locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },
    /// Mock account session
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage recurring order items
    Recurring {
        #[command(subcommand)]
        action: RecurringAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally within one category
    List {
        /// Category id
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`relevance`, `price-low-high`, `price-high-low`, `name-a-z`)
        #[arg(short, long, default_value_t = SortOrder::Relevance)]
        sort: SortOrder,
    },
    /// Show one product and related products
    Show {
        /// Product id
        id: String,
    },
    /// Search products by name, description and tags
    Search {
        /// Search text
        query: String,
    },
    /// List featured products
    Featured,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with its pricing breakdown
    Show {
        /// Preview the breakdown with a coupon code
        #[arg(long)]
        coupon: Option<String>,
    },
    /// Add a product
    Add {
        /// Product id
        product: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove one unit of a product
    Remove {
        /// Product id
        product: String,
    },
    /// Set the quantity of a product; zero or less removes it
    Set {
        /// Product id
        product: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum LocationAction {
    /// Search delivery locations
    Search {
        /// Search text; empty lists every location
        #[arg(default_value = "")]
        query: String,
    },
    /// Select a delivery location by id
    Select {
        /// Location id
        id: String,
    },
    /// Show the current and recent locations
    Show,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Mock login; any password is accepted
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum RecurringAction {
    /// List the signed-in user's recurring items
    List,
    /// Add a recurring item for the signed-in user
    Add {
        /// Product id
        product: String,

        /// Units per delivery
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Delivery frequency (`daily`, `weekly`, `monthly`)
        #[arg(short, long, default_value_t = Frequency::Daily)]
        frequency: Frequency,

        /// Delivery time of day (HH:MM)
        #[arg(short, long, default_value = "08:00")]
        time: DeliveryTime,

        /// Enable auto-pay
        #[arg(long)]
        auto_pay: bool,
    },
    /// Delete a recurring item by id
    Delete {
        /// Recurring item id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("qc_cli=info,quickcart_storefront=warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::open(&cli.data_dir)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, sort } => {
                commands::catalog::list(&ctx, category.as_deref(), sort)?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&ctx, &id)?,
            CatalogAction::Search { query } => commands::catalog::search(&ctx, &query),
            CatalogAction::Featured => commands::catalog::featured(&ctx),
        },
        Commands::Cart { action } => match action {
            CartAction::Show { coupon } => commands::cart::show(&ctx, coupon.as_deref())?,
            CartAction::Add { product, quantity } => {
                commands::cart::add(&ctx, &product, quantity)?;
            }
            CartAction::Remove { product } => commands::cart::remove(&ctx, &product)?,
            CartAction::Set { product, quantity } => {
                commands::cart::set(&ctx, &product, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Location { action } => match action {
            LocationAction::Search { query } => commands::location::search(&query),
            LocationAction::Select { id } => commands::location::select(&ctx, &id)?,
            LocationAction::Show => commands::location::show(&ctx)?,
        },
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(&ctx, &email, &password).await?;
            }
            AccountAction::Logout => commands::account::logout(&ctx)?,
            AccountAction::Whoami => commands::account::whoami(&ctx)?,
        },
        Commands::Recurring { action } => match action {
            RecurringAction::List => commands::recurring::list(&ctx)?,
            RecurringAction::Add {
                product,
                quantity,
                frequency,
                time,
                auto_pay,
            } => {
                let draft = commands::recurring::draft(&product, quantity, frequency, time, auto_pay);
                commands::recurring::add(&ctx, draft)?;
            }
            RecurringAction::Delete { id } => commands::recurring::delete(&ctx, &id)?,
        },
    }
    Ok(())
}
