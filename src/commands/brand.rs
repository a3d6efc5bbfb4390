//! Brand search command implementation.

use crate::api::{ApiClient, PriceApi};
use crate::config::Config;
use crate::format::Formatter;
use crate::session::{QuerySession, QueryState};
use anyhow::{Context, Result};
use tracing::info;

/// Looks up a brand on the price service.
pub struct BrandCommand {
    config: Config,
}

impl BrandCommand {
    /// Creates a new brand command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the brand search and returns formatted output.
    pub async fn execute(&self, brand: &str) -> Result<String> {
        let client = ApiClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, brand).await
    }

    /// Runs the brand search with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl PriceApi, brand: &str) -> Result<String> {
        let brand = brand.trim();
        if brand.is_empty() {
            anyhow::bail!("Brand name cannot be empty");
        }

        let mut session = QuerySession::new();
        session.submit(brand, |q| async move { client.search_brand(&q).await }).await;

        match session.state() {
            QueryState::Success(result) => {
                info!("Brand {} status: {}", result.brand, result.status);
                Ok(Formatter::new(self.config.format).format_brand(result))
            }
            QueryState::Error(message) => anyhow::bail!("{}", message),
            other => anyhow::bail!("Brand search did not complete (state: {})", other.label()),
        }
    }
}
