//! Price scraping service integration.
//!
//! The service scrapes Jumbo, Santa Isabel and Líder on demand and returns one
//! result per retailer. This module owns the HTTP client, the validated data
//! contract, and the error type surfaced to callers.

mod client;
mod error;
mod models;
pub mod retailers;

pub use client::{ApiClient, PriceApi};
pub use error::ApiError;
pub use models::{BrandSearch, ComparisonSet, RetailerResult, ScrapeRequest};
pub use retailers::Retailer;
