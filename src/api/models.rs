//! Data models for price service requests and responses.
//!
//! The service payload is loosely shaped, so every response is deserialized
//! into a raw wire struct first and then validated into the domain types
//! below. A broken envelope is an invalid response shape; a broken row only
//! downgrades that row.

use super::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Body of `POST /scrape/all`.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest<'a> {
    pub product_name: &'a str,
}

/// One retailer's answer for a product query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetailerResult {
    /// Retailer identifier as reported by the service
    pub retailer: String,
    /// Whether the product was located at this retailer
    pub found: bool,
    /// Display name of the matched product
    pub name: Option<String>,
    /// Locale-formatted price string, e.g. "$1.234"
    pub price: Option<String>,
    /// Retailer-specific product identifier
    pub sku: Option<String>,
    /// Deep link to the product page (only kept for found products)
    pub url: Option<String>,
}

impl RetailerResult {
    /// Creates a found result with a name and price.
    pub fn found(
        retailer: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            retailer: retailer.into(),
            found: true,
            name: Some(name.into()),
            price: Some(price.into()),
            sku: None,
            url: None,
        }
    }

    /// Creates a not-found result.
    pub fn not_found(retailer: impl Into<String>) -> Self {
        Self {
            retailer: retailer.into(),
            found: false,
            name: None,
            price: None,
            sku: None,
            url: None,
        }
    }

    /// Sets the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Sets the product URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the raw price string regardless of found status.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

/// All retailer results for a single query, in service response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    results: Vec<RetailerResult>,
}

impl ComparisonSet {
    /// Creates a comparison set from results in response order.
    pub fn new(results: Vec<RetailerResult>) -> Self {
        Self { results }
    }

    /// Iterates results in response order.
    pub fn iter(&self) -> std::slice::Iter<'_, RetailerResult> {
        self.results.iter()
    }

    /// Returns the results as a slice.
    pub fn as_slice(&self) -> &[RetailerResult] {
        &self.results
    }

    /// Returns number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if the service returned no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of retailers that found the product.
    pub fn found_count(&self) -> usize {
        self.results.iter().filter(|r| r.found).count()
    }
}

impl From<Vec<RetailerResult>> for ComparisonSet {
    fn from(results: Vec<RetailerResult>) -> Self {
        Self::new(results)
    }
}

impl<'a> IntoIterator for &'a ComparisonSet {
    type Item = &'a RetailerResult;
    type IntoIter = std::slice::Iter<'a, RetailerResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Result of a brand search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandSearch {
    /// Brand identifier echoed by the service
    pub brand: String,
    /// Processing status reported by the service
    pub status: String,
    /// Optional human-readable message
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawScrapeResponse {
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBrandResponse {
    brand: String,
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Trims a string and maps blanks to None.
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Reads an optional text field; null and absent are None, other types are logged and dropped.
fn text_field(row: &Map<String, Value>, key: &str, index: usize) -> Option<String> {
    match row.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => non_blank(Some(s.clone())),
        Some(other) => {
            warn!("Result #{}: ignoring non-text {} {}", index, key, other);
            None
        }
    }
}

/// Reads the sku, which the service sends as either text or a number.
fn sku_field(row: &Map<String, Value>, index: usize) -> Option<String> {
    match row.get("sku") {
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => text_field(row, "sku", index),
    }
}

impl RawScrapeResponse {
    /// Parses and validates a `/scrape/all` response body.
    pub(crate) fn parse(body: &str) -> Result<ComparisonSet, ApiError> {
        let raw: RawScrapeResponse = serde_json::from_str(body).map_err(ApiError::shape)?;
        Ok(raw.validate())
    }

    fn validate(self) -> ComparisonSet {
        let results = self
            .results
            .iter()
            .enumerate()
            .filter_map(|(i, value)| Self::row(i + 1, value))
            .collect();

        ComparisonSet::new(results)
    }

    /// Converts one wire row, downgrading bad fields. Rows that cannot be
    /// attributed to a retailer are skipped.
    fn row(index: usize, value: &Value) -> Option<RetailerResult> {
        let Some(row) = value.as_object() else {
            warn!("Result #{}: skipping non-object row {}", index, value);
            return None;
        };

        let Some(retailer) = text_field(row, "retailer", index) else {
            warn!("Result #{}: skipping row without a retailer", index);
            return None;
        };

        let found = match row.get("encontrado") {
            Some(Value::Bool(found)) => *found,
            Some(other) => {
                warn!("Result #{} ({}): treating encontrado {} as not found", index, retailer, other);
                false
            }
            None => {
                warn!("Result #{} ({}): missing encontrado, treating as not found", index, retailer);
                false
            }
        };

        Some(RetailerResult {
            name: text_field(row, "nombre", index),
            price: text_field(row, "precio", index),
            sku: sku_field(row, index),
            url: if found { text_field(row, "url", index) } else { None },
            retailer,
            found,
        })
    }
}

impl RawBrandResponse {
    /// Parses and validates a `/brands/search` response body.
    pub(crate) fn parse(body: &str) -> Result<BrandSearch, ApiError> {
        let raw: RawBrandResponse = serde_json::from_str(body).map_err(ApiError::shape)?;

        Ok(BrandSearch {
            brand: raw.brand,
            status: raw.status,
            message: non_blank(raw.message),
        })
    }
}
