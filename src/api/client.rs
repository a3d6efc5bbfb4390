//! HTTP client for the price scraping service.

use super::error::ApiError;
use super::models::{BrandSearch, ComparisonSet, RawBrandResponse, RawScrapeResponse, ScrapeRequest};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::{Client, Response};

/// Trait for price service operations - enables mocking for tests.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Scrapes every retailer for a product name.
    async fn scrape_all(&self, product_name: &str) -> Result<ComparisonSet, ApiError>;

    /// Searches a brand's catalogue.
    async fn search_brand(&self, brand: &str) -> Result<BrandSearch, ApiError>;
}

/// Price service HTTP client.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: config.api_url.trim_end_matches('/').to_string() })
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reads the body and maps non-2xx responses to status errors.
    async fn read(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl PriceApi for ApiClient {
    async fn scrape_all(&self, product_name: &str) -> Result<ComparisonSet, ApiError> {
        let url = format!("{}/scrape/all", self.base_url);
        let payload = serde_json::to_string(&ScrapeRequest { product_name })
            .map_err(ApiError::shape)?;

        info!("Comparing prices for: {}", product_name);
        debug!("POST {}", url);

        let response = self
            .client
            .post(url.as_str())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await?;

        let body = Self::read(response).await?;
        RawScrapeResponse::parse(&body)
    }

    async fn search_brand(&self, brand: &str) -> Result<BrandSearch, ApiError> {
        let url = format!("{}/brands/search?q={}", self.base_url, urlencoding::encode(brand));

        info!("Searching brand: {}", brand);
        debug!("GET {}", url);

        let response =
            self.client.get(url.as_str()).header("Accept", "application/json").send().await?;

        let body = Self::read(response).await?;
        RawBrandResponse::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(api_url: String) -> Config {
        Config { api_url, timeout_secs: 5, ..Config::default() }
    }

    #[tokio::test]
    async fn test_scrape_all_success() {
        let mock_server = MockServer::start().await;

        let body = r#"{"results": [
            {"retailer": "Jumbo", "encontrado": true, "nombre": "Leche Entera", "precio": "$1.290", "sku": "1"},
            {"retailer": "Lider", "encontrado": true, "nombre": "Leche Entera", "precio": "$1.190", "sku": "2"},
            {"retailer": "Santa Isabel", "encontrado": false}
        ]}"#;

        Mock::given(method("POST"))
            .and(path("/scrape/all"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({"product_name": "Leche Entera"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let set = client.scrape_all("Leche Entera").await.unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.found_count(), 2);
        assert_eq!(set.as_slice()[1].price.as_deref(), Some("$1.190"));
    }

    #[tokio::test]
    async fn test_scrape_all_server_error_with_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scrape/all"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string(r#"{"detail": "Scraper timeout"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let err = client.scrape_all("Leche").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Scraper timeout"));
    }

    #[tokio::test]
    async fn test_scrape_all_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scrape/all"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let err = client.scrape_all("Leche").await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_scrape_all_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scrape/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let err = client.scrape_all("Leche").await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponseShape(_)));
    }

    #[tokio::test]
    async fn test_scrape_all_unreachable() {
        // Nothing listens on port 9 locally
        let client = ApiClient::new(&make_test_config("http://127.0.0.1:9".to_string())).unwrap();
        let err = client.scrape_all("Leche").await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.to_string().starts_with("Could not reach the price service"));
    }

    #[tokio::test]
    async fn test_search_brand_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/brands/search"))
            .and(query_param("q", "Soprole"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"brand": "Soprole", "status": "completed", "message": "42 products"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let brand = client.search_brand("Soprole").await.unwrap();

        assert_eq!(brand.brand, "Soprole");
        assert_eq!(brand.status, "completed");
        assert_eq!(brand.message.as_deref(), Some("42 products"));
    }

    #[tokio::test]
    async fn test_search_brand_encodes_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/brands/search"))
            .and(query_param("q", "Nestlé & Co"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"brand": "Nestlé & Co", "status": "ok"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let brand = client.search_brand("Nestlé & Co").await.unwrap();

        assert_eq!(brand.brand, "Nestlé & Co");
    }

    #[tokio::test]
    async fn test_search_brand_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/brands/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&make_test_config(mock_server.uri())).unwrap();
        let result = client.search_brand("Colun").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("503"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new(&make_test_config("http://localhost:8000/".to_string())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(urlencoding::encode("Santa Isabel"), "Santa%20Isabel");
    }
}
