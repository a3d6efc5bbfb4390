//! Price reconciliation engine.
//!
//! Turns a raw, partially-failed [`ComparisonSet`] into a [`DerivedComparison`]:
//! every row gets a status, found rows get a normalized price, and exactly one
//! row is flagged as cheapest when any valid price exists. Nothing here fails;
//! bad data downgrades the affected row only.

pub mod normalizer;
pub mod resolver;

use crate::api::{ComparisonSet, RetailerResult};
use normalizer::parse_price;
use serde::Serialize;

pub use normalizer::{format_price, PriceParseError};
pub use resolver::{cheapest, cheapest_position, cheapest_retailer, priced_results};

/// Reconciliation outcome for a single retailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum RowStatus {
    /// Found with a usable price in whole pesos
    Priced(u64),
    /// Found, but the price was missing or unparseable
    Unpriced,
    /// Retailer did not carry the product
    NotFound,
}

/// One retailer's row in a reconciled comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub result: RetailerResult,
    pub status: RowStatus,
    pub is_cheapest: bool,
}

impl ComparisonRow {
    /// Returns the normalized price if this row is priced.
    pub fn amount(&self) -> Option<u64> {
        match self.status {
            RowStatus::Priced(amount) => Some(amount),
            _ => None,
        }
    }
}

/// Derived view of a comparison set, recomputed per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedComparison {
    /// All rows in service response order
    pub rows: Vec<ComparisonRow>,
    /// Identifier of the cheapest retailer
    pub cheapest: Option<String>,
}

impl DerivedComparison {
    /// Reconciles a comparison set.
    pub fn from_set(set: &ComparisonSet) -> Self {
        let mut rows: Vec<ComparisonRow> = set
            .iter()
            .map(|result| ComparisonRow {
                status: row_status(result),
                result: result.clone(),
                is_cheapest: false,
            })
            .collect();

        let cheapest = cheapest_position(set).map(|i| {
            rows[i].is_cheapest = true;
            rows[i].result.retailer.clone()
        });

        Self { rows, cheapest }
    }

    /// Iterates rows that are found and priced.
    pub fn priced(&self) -> impl Iterator<Item = (&ComparisonRow, u64)> {
        self.rows.iter().filter_map(|row| row.amount().map(|amount| (row, amount)))
    }

    /// Returns the row flagged as cheapest.
    pub fn cheapest_row(&self) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.is_cheapest)
    }

    /// Returns the most expensive priced row.
    pub fn most_expensive_row(&self) -> Option<&ComparisonRow> {
        self.priced().max_by_key(|(_, amount)| *amount).map(|(row, _)| row)
    }

    /// Spread between the most expensive and cheapest valid prices.
    pub fn max_savings(&self) -> Option<u64> {
        let low = self.cheapest_row()?.amount()?;
        let high = self.most_expensive_row()?.amount()?;
        Some(high - low)
    }

    /// Savings as a percentage of the most expensive price.
    pub fn max_savings_percent(&self) -> Option<f64> {
        let high = self.most_expensive_row()?.amount()?;
        if high == 0 {
            return None;
        }
        self.max_savings().map(|savings| savings as f64 / high as f64 * 100.0)
    }

    /// Number of retailers that found the product.
    pub fn found_count(&self) -> usize {
        self.rows.iter().filter(|row| row.status != RowStatus::NotFound).count()
    }

    /// Returns true if there are no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn row_status(result: &RetailerResult) -> RowStatus {
    if !result.found {
        return RowStatus::NotFound;
    }

    match result.price.as_deref().map(parse_price) {
        Some(Ok(amount)) => RowStatus::Priced(amount),
        _ => RowStatus::Unpriced,
    }
}

/// Reconciles a comparison set into its derived view.
pub fn reconcile(set: &ComparisonSet) -> DerivedComparison {
    DerivedComparison::from_set(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ComparisonSet {
        ComparisonSet::new(vec![
            RetailerResult::found("A", "Leche", "$1.500"),
            RetailerResult::found("B", "Leche", "$1.200"),
            RetailerResult::not_found("C").with_price("$999"),
        ])
    }

    #[test]
    fn test_reconcile_scenario() {
        let derived = reconcile(&scenario());

        assert_eq!(derived.cheapest.as_deref(), Some("B"));
        assert_eq!(derived.rows.len(), 3);
        assert_eq!(derived.rows[0].status, RowStatus::Priced(1500));
        assert_eq!(derived.rows[1].status, RowStatus::Priced(1200));
        assert_eq!(derived.rows[2].status, RowStatus::NotFound);
        assert!(!derived.rows[0].is_cheapest);
        assert!(derived.rows[1].is_cheapest);
        assert!(!derived.rows[2].is_cheapest);
    }

    #[test]
    fn test_exactly_one_cheapest_on_tie() {
        let set = ComparisonSet::new(vec![
            RetailerResult::found("Jumbo", "Leche", "$1.290"),
            RetailerResult::found("Jumbo", "Leche Light", "$1.290"),
        ]);

        let derived = reconcile(&set);
        assert_eq!(derived.rows.iter().filter(|r| r.is_cheapest).count(), 1);
        assert!(derived.rows[0].is_cheapest);
    }

    #[test]
    fn test_unpriced_row() {
        let set = ComparisonSet::new(vec![
            RetailerResult::found("A", "Leche", "$-"),
            RetailerResult::found("B", "Leche", "$2.000"),
        ]);

        let derived = reconcile(&set);
        assert_eq!(derived.rows[0].status, RowStatus::Unpriced);
        assert_eq!(derived.priced().count(), 1);
        assert_eq!(derived.found_count(), 2);
        assert_eq!(derived.cheapest.as_deref(), Some("B"));
    }

    #[test]
    fn test_no_cheapest_when_nothing_found() {
        let set = ComparisonSet::new(vec![
            RetailerResult::not_found("A"),
            RetailerResult::not_found("B"),
        ]);

        let derived = reconcile(&set);
        assert!(derived.cheapest.is_none());
        assert!(derived.cheapest_row().is_none());
        assert!(derived.max_savings().is_none());
        assert!(derived.rows.iter().all(|r| !r.is_cheapest));
    }

    #[test]
    fn test_max_savings() {
        let derived = reconcile(&scenario());
        assert_eq!(derived.max_savings(), Some(300));
        assert_eq!(derived.max_savings_percent(), Some(20.0));
        assert_eq!(derived.most_expensive_row().unwrap().result.retailer, "A");
    }

    #[test]
    fn test_max_savings_single_price() {
        let set = ComparisonSet::new(vec![RetailerResult::found("A", "Leche", "$990")]);

        let derived = reconcile(&set);
        assert_eq!(derived.max_savings(), Some(0));
        assert_eq!(derived.max_savings_percent(), Some(0.0));
    }

    #[test]
    fn test_max_savings_percent_all_zero() {
        let set = ComparisonSet::new(vec![
            RetailerResult::found("A", "x", "$0"),
            RetailerResult::found("B", "x", "$0"),
        ]);

        let derived = reconcile(&set);
        assert_eq!(derived.max_savings(), Some(0));
        assert!(derived.max_savings_percent().is_none());
    }

    #[test]
    fn test_agrees_with_resolver() {
        let set = ComparisonSet::new(vec![
            RetailerResult::found("A", "x", "Consultar"),
            RetailerResult::found("B", "x", "$2.490"),
            RetailerResult::found("C", "x", "$2.490"),
            RetailerResult::not_found("D").with_price("$10"),
        ]);

        assert_eq!(reconcile(&set).cheapest.as_deref(), cheapest_retailer(&set));
    }

    #[test]
    fn test_reconcile_idempotent() {
        let set = scenario();
        assert_eq!(reconcile(&set), reconcile(&set));
    }

    #[test]
    fn test_row_status_serde() {
        let json = serde_json::to_string(&RowStatus::Priced(1290)).unwrap();
        assert_eq!(json, r#"{"status":"priced","amount":1290}"#);

        let json = serde_json::to_string(&RowStatus::NotFound).unwrap();
        assert_eq!(json, r#"{"status":"not_found"}"#);
    }
}
