//! Vitrine CLI - Brand selection and debug tools.
//!
//! # Usage
//!
//! ```bash
//! # List the brands that have an env file under brands/
//! vt-cli brand list
//!
//! # Make a brand the active one (writes .env)
//! vt-cli brand select acme
//!
//! # gzip + base64 round trip
//! vt-cli debug compress "hello"
//! vt-cli debug decompress H4sIAAAAAAAA/8tIzcnJBwCGphA2BQAAAA==
//!
//! # Which price does a customer pay?
//! vt-cli debug price --user-type wholesale --retail 10 --wholesale 8
//!
//! # Render a variant label
//! vt-cli debug variant-label --schema '[{"name":"size","options":["S","M"]}]' --select size=M
//!
//! # Next order number of the active brand
//! vt-cli orders next-number
//! ```
//!
//! # Commands
//!
//! - `brand` - List and select brand env files
//! - `debug` - Compression, price selection and variant label helpers
//! - `orders` - Order numbering against the active brand's backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use vitrine_core::UserType;

mod commands;

#[derive(Parser)]
#[command(name = "vt-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage brand env files
    Brand {
        #[command(subcommand)]
        action: BrandAction,
    },
    /// Debug utilities
    Debug {
        #[command(subcommand)]
        action: DebugAction,
    },
    /// Order tools for the active brand
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum BrandAction {
    /// List available brands
    List {
        /// Directory holding `<brand>.env` files
        #[arg(long, default_value = "brands")]
        dir: PathBuf,
    },
    /// Make a brand active by writing its env file to `.env`
    Select {
        /// Brand identifier (file stem under the brands directory)
        client: String,

        /// Directory holding `<brand>.env` files
        #[arg(long, default_value = "brands")]
        dir: PathBuf,

        /// Env file to write
        #[arg(short, long, default_value = ".env")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum DebugAction {
    /// gzip then base64 a text
    Compress {
        /// Text to compress
        text: String,
    },
    /// Reverse `compress`
    Decompress {
        /// base64 data produced by `compress`
        data: String,
    },
    /// Show the price a customer of the given type pays
    Price {
        /// Customer type
        #[arg(short, long, value_enum, default_value = "retail")]
        user_type: UserTypeArg,

        /// Retail price
        #[arg(short, long)]
        retail: Decimal,

        /// Wholesale price, if the product has one
        #[arg(short, long)]
        wholesale: Option<Decimal>,

        /// ISO 4217 currency code
        #[arg(short, long, default_value = "USD")]
        currency: String,
    },
    /// Render the label of a variant selection
    VariantLabel {
        /// Variant schema as JSON (the product's `variants` column)
        #[arg(short, long)]
        schema: String,

        /// Selected value as `attribute=value` (repeatable)
        #[arg(long = "select", value_name = "ATTRIBUTE=VALUE")]
        selections: Vec<String>,

        /// Language code for attribute labels
        #[arg(short, long, default_value = "en")]
        language: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Print the order number the next checkout would get
    NextNumber,
}

#[derive(Clone, Copy, ValueEnum)]
enum UserTypeArg {
    Retail,
    Wholesale,
}

impl From<UserTypeArg> for UserType {
    fn from(value: UserTypeArg) -> Self {
        match value {
            UserTypeArg::Retail => Self::Retail,
            UserTypeArg::Wholesale => Self::Wholesale,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr, so command output stays pipeable)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Brand { action } => match action {
            BrandAction::List { dir } => {
                let brands = commands::brand::list_brands(&dir)?;
                commands::output(&brands.join("\n"));
            }
            BrandAction::Select {
                client,
                dir,
                output,
            } => {
                commands::brand::select_brand(&dir, &client, &output)?;
                tracing::info!(brand = %client, path = %output.display(), "Brand selected");
            }
        },
        Commands::Debug { action } => match action {
            DebugAction::Compress { text } => {
                commands::output(&commands::debug::compress(&text)?);
            }
            DebugAction::Decompress { data } => {
                commands::output(&commands::debug::decompress(&data)?);
            }
            DebugAction::Price {
                user_type,
                retail,
                wholesale,
                currency,
            } => {
                let price = commands::debug::price(user_type.into(), retail, wholesale, &currency)?;
                commands::output(&price.display());
            }
            DebugAction::VariantLabel {
                schema,
                selections,
                language,
            } => {
                let label = commands::debug::variant_label(&schema, &selections, &language)?;
                commands::output(&label);
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::NextNumber => {
                let number = commands::orders::next_number().await?;
                commands::output(&number.to_string());
            }
        },
    }
    Ok(())
}
