//! Product price comparison command implementation.

use crate::api::{ApiClient, PriceApi};
use crate::config::Config;
use crate::format::Formatter;
use crate::reconcile::reconcile;
use crate::session::{QuerySession, QueryState};
use anyhow::{Context, Result};
use tracing::info;

/// Compares a product's price across all retailers.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the comparison and returns formatted output.
    pub async fn execute(&self, product_name: &str) -> Result<String> {
        let client = ApiClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, product_name).await
    }

    /// Runs the comparison with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PriceApi,
        product_name: &str,
    ) -> Result<String> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            anyhow::bail!("Product name cannot be empty");
        }

        let mut session = QuerySession::new();
        session.submit(product_name, |q| async move { client.scrape_all(&q).await }).await;

        match session.state() {
            QueryState::Success(set) => {
                let comparison = reconcile(set);
                info!(
                    "{} of {} retailers carry {}",
                    comparison.found_count(),
                    set.len(),
                    product_name
                );

                let formatter = Formatter::new(self.config.format);
                Ok(formatter.format_comparison(product_name, &comparison))
            }
            QueryState::Error(message) => anyhow::bail!("{}", message),
            other => anyhow::bail!("Comparison did not complete (state: {})", other.label()),
        }
    }
}
