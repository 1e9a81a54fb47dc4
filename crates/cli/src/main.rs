//! Synergy Mobiles CLI - storefront client and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! sm-cli products
//! sm-cli products -k "galaxy"
//! sm-cli show 665f1c2e9b1e8a0012ab34cd
//!
//! # Manage the cart (persisted under SYNERGY_STATE_DIR)
//! sm-cli cart add 665f1c2e9b1e8a0012ab34cd -q 2
//! sm-cli cart show
//!
//! # Account
//! sm-cli login -e you@example.com -p secret
//! sm-cli orders
//!
//! # Place the order in the cart
//! sm-cli checkout --name "Ali Raza" --email you@example.com \
//!     --phone 03001234567 --address "House 12" --city Lahore \
//!     --payment bank_transfer --agree-terms
//! ```
//!
//! # Commands
//!
//! - `products` / `show` - Browse the catalog
//! - `cart` - Inspect and mutate the persisted cart
//! - `login` / `signup` / `logout` / `orders` - Account management
//! - `checkout` - Drive the checkout wizard and submit the order
//! - `admin` - Catalog management (requires an admin account)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "Synergy Mobiles storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Filter by a name keyword (server-side search)
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Show a single product
    Show {
        /// Product id
        id: String,
    },
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in to an existing account
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and drop the stored credential
    Logout,
    /// List your past orders, newest first
    Orders,
    /// Drive the checkout wizard over the current cart and submit the order
    Checkout(Box<commands::checkout::CheckoutArgs>),
    /// Catalog management (admin account required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Apply a signed quantity delta (floors at 1)
    Update {
        /// Product id
        id: String,

        /// Signed delta, e.g. 1 or -1
        delta: i32,
    },
    /// Empty the cart
    Clear,
    /// Print the cart contents and totals
    Show,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a product from a JSON file
    Create {
        /// Path to a JSON product description
        file: std::path::PathBuf,
    },
    /// Update a product from a JSON file
    Update {
        /// Product id
        id: String,

        /// Path to a JSON product description
        file: std::path::PathBuf,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
    /// Upload product images, printing the stored URLs
    Upload {
        /// Image files to upload
        files: Vec<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { keyword } => {
            commands::catalog::list(keyword.as_deref()).await?;
        }
        Commands::Show { id } => commands::catalog::show(&id).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { id, quantity } => commands::cart::add(&id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(&id)?,
            CartAction::Update { id, delta } => commands::cart::update(&id, delta)?,
            CartAction::Clear => commands::cart::clear()?,
            CartAction::Show => commands::cart::show()?,
        },
        Commands::Login { email, password } => {
            commands::account::login(&email, &password).await?;
        }
        Commands::Signup {
            name,
            email,
            password,
        } => commands::account::signup(&name, &email, &password).await?,
        Commands::Logout => commands::account::logout()?,
        Commands::Orders => commands::account::orders().await?,
        Commands::Checkout(args) => commands::checkout::run(*args).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { file } => commands::admin::create(&file).await?,
            AdminAction::Update { id, file } => commands::admin::update(&id, &file).await?,
            AdminAction::Delete { id } => commands::admin::delete(&id).await?,
            AdminAction::Upload { files } => commands::admin::upload(&files).await?,
        },
    }
    Ok(())
}
