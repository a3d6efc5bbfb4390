//! simplify - Grocery price comparison CLI
//!
//! Compares a product's price at Jumbo, Santa Isabel and Líder through the
//! Simplify scraping service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use simplify::api::Retailer;
use simplify::commands::{BrandCommand, CompareCommand, ShellCommand, ShellMode};
use simplify::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "simplify",
    version,
    about = "Compare grocery prices at Jumbo, Santa Isabel and Líder",
    long_about = "Queries the Simplify scraping service and highlights the cheapest retailer for a product."
)]
struct Cli {
    /// Base URL of the price service
    #[arg(long, global = true, env = "SIMPLIFY_API_URL")]
    api_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SIMPLIFY_PROXY")]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SIMPLIFY_TIMEOUT")]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a product's price across retailers
    #[command(alias = "c")]
    Compare {
        /// Product name, e.g. "Leche Soprole Entera Natural 1 L"
        product: String,
    },

    /// Search a brand's catalogue
    #[command(alias = "b")]
    Brand {
        /// Brand name, e.g. "Soprole"
        name: String,
    },

    /// Interactive mode: one query per line
    Shell {
        /// Search brands instead of products
        #[arg(long)]
        brand: bool,
    },

    /// List supported retailers
    Retailers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Compare { product } => {
            let output = CompareCommand::new(config).execute(&product).await?;
            println!("{}", output);
        }

        Commands::Brand { name } => {
            let output = BrandCommand::new(config).execute(&name).await?;
            println!("{}", output);
        }

        Commands::Shell { brand } => {
            let mode = if brand { ShellMode::Brand } else { ShellMode::Product };
            ShellCommand::new(config, mode).execute().await?;
        }

        Commands::Retailers => {
            println!("Supported retailers:\n");
            println!("{:<14} {:<14} {:<16}", "Code", "Name", "Domain");
            println!("{:-<14} {:-<14} {:-<16}", "", "", "");

            for retailer in Retailer::all() {
                println!(
                    "{:<14} {:<14} {:<16}",
                    retailer.to_string(),
                    retailer.name(),
                    retailer.domain()
                );
            }
        }
    }

    Ok(())
}
