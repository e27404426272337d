//! MelonMart storefront client.

mod format;
mod shell;
mod widget;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use melonmart_api::{GeminiQualityAnalyzer, HttpStorefrontGateway};
use melonmart_application::AppContext;
use melonmart_core::{ProductId, QualityAnalyzer};
use melonmart_infrastructure::{AppConfig, FileTokenStore};

use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "melonmart", about = "Fresh-melon marketplace client", version)]
struct Cli {
    /// Storefront API origin, overriding config and environment.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive storefront shell (the default).
    Shell,
    /// Print the product catalog and exit.
    Catalog,
    /// Print one product and exit.
    Product { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    debug!(api = %config.api_base_url, "starting");

    let gateway = Arc::new(HttpStorefrontGateway::new(&config.api_base_url));
    let tokens = Arc::new(FileTokenStore::default_location()?);
    let ctx = AppContext::new(gateway, tokens);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let analyzer: Option<Arc<dyn QualityAnalyzer>> = config
                .analysis_api_key
                .as_deref()
                .map(|key| Arc::new(GeminiQualityAnalyzer::new(key)) as Arc<dyn QualityAnalyzer>);
            Shell::new(ctx, analyzer).run().await
        }
        Command::Catalog => {
            let products = ctx.gateway().list_products().await?;
            for product in &products {
                println!(
                    "[{}] {} {}",
                    product.id,
                    product.name.bold(),
                    format::format_rupiah(product.price)
                );
            }
            Ok(())
        }
        Command::Product { id } => {
            let product = ctx.gateway().product_detail(&ProductId::from(id)).await?;
            println!("{}", product.name.bold());
            println!("  Price:  {}", format::format_rupiah(product.price));
            if !product.quality_grade.is_empty() {
                println!("  Grade:  {}", product.quality_grade);
            }
            if !product.origin.is_empty() {
                println!("  Origin: {}", product.origin);
            }
            if !product.description.is_empty() {
                println!("  {}", product.description);
            }
            Ok(())
        }
    }
}
