//! simplify - Grocery price comparison across Jumbo, Santa Isabel and Líder
//!
//! Queries a remote scraping service and reconciles the per-retailer answers
//! into a single comparison with normalized prices and a cheapest pick.

pub mod api;
pub mod commands;
pub mod config;
pub mod format;
pub mod reconcile;
pub mod session;

pub use api::{ComparisonSet, Retailer, RetailerResult};
pub use config::Config;
pub use reconcile::{reconcile, DerivedComparison};
