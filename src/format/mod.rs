//! Output formatting for comparisons and brand searches (table, JSON, markdown, CSV).

use crate::api::{BrandSearch, Retailer};
use crate::config::OutputFormat;
use crate::reconcile::{format_price, ComparisonRow, DerivedComparison, RowStatus};
use serde::Serialize;

const NOT_FOUND: &str = "Not found";
const PLACEHOLDER: &str = "-";

/// JSON shape of a rendered comparison.
#[derive(Serialize)]
struct ComparisonReport<'a> {
    query: &'a str,
    found: usize,
    max_savings: Option<u64>,
    #[serde(flatten)]
    comparison: &'a DerivedComparison,
}

/// Formats comparison results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a reconciled comparison for a query.
    pub fn format_comparison(&self, query: &str, comparison: &DerivedComparison) -> String {
        if comparison.is_empty() {
            return match self.format {
                OutputFormat::Json => self.json_comparison(query, comparison),
                OutputFormat::Csv => self.csv_header(),
                _ => "No results returned by the price service.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_comparison(query, comparison),
            OutputFormat::Table => self.table_comparison(query, comparison),
            OutputFormat::Markdown => self.markdown_comparison(query, comparison),
            OutputFormat::Csv => self.csv_comparison(comparison),
        }
    }

    /// Formats a brand search result.
    pub fn format_brand(&self, brand: &BrandSearch) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(brand).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("Brand:   {}", brand.brand),
                    format!("Status:  {}", brand.status),
                ];
                if let Some(message) = &brand.message {
                    lines.push(format!("Message: {}", message));
                }
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = vec![
                    format!("## {}", brand.brand),
                    String::new(),
                    format!("- **Status:** {}", brand.status),
                ];
                if let Some(message) = &brand.message {
                    lines.push(format!("- **Message:** {}", message));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => format!(
                "brand,status,message\n{},{},{}",
                Self::csv_escape(&brand.brand),
                Self::csv_escape(&brand.status),
                brand.message.as_deref().map(Self::csv_escape).unwrap_or_default()
            ),
        }
    }

    // JSON formatting

    fn json_comparison(&self, query: &str, comparison: &DerivedComparison) -> String {
        let report = ComparisonReport {
            query,
            found: comparison.found_count(),
            max_savings: comparison.max_savings(),
            comparison,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_comparison(&self, query: &str, comparison: &DerivedComparison) -> String {
        let retailer_width = 14;
        let name_width = 40;
        let price_width = 12;
        let sku_width = 12;

        let mut lines = Vec::new();

        lines.push(format!("Results for \"{}\"", query));
        lines.push(String::new());
        lines.push(format!(
            "   {:<retailer_width$}  {:<name_width$}  {:>price_width$}  {:<sku_width$}  {}",
            "Retailer", "Product", "Price", "SKU", "Link"
        ));
        lines.push(format!(
            "   {:-<retailer_width$}  {:-<name_width$}  {:->price_width$}  {:-<sku_width$}  {:-<20}",
            "", "", "", "", ""
        ));

        for row in &comparison.rows {
            let marker = if row.is_cheapest { "🏆 " } else { "   " };
            lines.push(format!(
                "{}{:<retailer_width$}  {:<name_width$}  {:>price_width$}  {:<sku_width$}  {}",
                marker,
                truncate(&Retailer::display_name(&row.result.retailer), retailer_width),
                truncate(&display_name(row), name_width),
                display_price(row),
                truncate(row.result.sku.as_deref().unwrap_or(PLACEHOLDER), sku_width),
                display_link(row)
            ));
        }

        lines.push(String::new());
        lines.extend(self.summary(comparison));

        lines.join("\n")
    }

    fn summary(&self, comparison: &DerivedComparison) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!(
            "Found at {} of {} retailers",
            comparison.found_count(),
            comparison.rows.len()
        ));

        match comparison.cheapest_row() {
            Some(row) => {
                let amount = row.amount().unwrap_or_default();
                lines.push(format!(
                    "Cheapest: {} at {}",
                    Retailer::display_name(&row.result.retailer),
                    format_price(amount)
                ));
            }
            None => lines.push("No comparable prices.".to_string()),
        }

        if let (Some(savings), Some(pct)) =
            (comparison.max_savings(), comparison.max_savings_percent())
        {
            if savings > 0 {
                lines.push(format!("💰 Max savings: {} ({:.0}%)", format_price(savings), pct));
            }
        }

        lines
    }

    // Markdown formatting

    fn markdown_comparison(&self, query: &str, comparison: &DerivedComparison) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", query));
        lines.push(String::new());
        lines.push("| Retailer | Product | Price | SKU | Link |".to_string());
        lines.push("|----------|---------|-------|-----|------|".to_string());

        for row in &comparison.rows {
            let retailer = Retailer::display_name(&row.result.retailer);
            let (retailer, price) = if row.is_cheapest {
                (format!("**{}** 🏆", retailer), format!("**{}**", display_price(row)))
            } else {
                (retailer, display_price(row))
            };

            let link = match (&row.status, &row.result.url) {
                (RowStatus::NotFound, _) | (_, None) => PLACEHOLDER.to_string(),
                (_, Some(url)) => format!("[View]({})", md_escape(url)),
            };

            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                retailer,
                md_escape(&display_name(row)),
                price,
                md_escape(row.result.sku.as_deref().unwrap_or(PLACEHOLDER)),
                link
            ));
        }

        lines.push(String::new());
        for line in self.summary(comparison) {
            lines.push(format!("*{}*", line));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "retailer,found,name,price,amount,sku,url,cheapest".to_string()
    }

    fn csv_comparison(&self, comparison: &DerivedComparison) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for row in &comparison.rows {
            let result = &row.result;
            let (name, price) = match row.status {
                RowStatus::NotFound => (None, None),
                _ => (result.name.as_deref(), result.price.as_deref()),
            };
            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                Self::csv_escape(&result.retailer),
                result.found,
                name.map(Self::csv_escape).unwrap_or_default(),
                price.map(Self::csv_escape).unwrap_or_default(),
                row.amount().map(|a| a.to_string()).unwrap_or_default(),
                result.sku.as_deref().map(Self::csv_escape).unwrap_or_default(),
                result.url.as_deref().map(Self::csv_escape).unwrap_or_default(),
                row.is_cheapest
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn display_name(row: &ComparisonRow) -> String {
    match row.status {
        RowStatus::NotFound => NOT_FOUND.to_string(),
        _ => row.result.name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

fn display_price(row: &ComparisonRow) -> String {
    match row.status {
        RowStatus::Priced(_) | RowStatus::Unpriced => {
            row.result.price.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
        }
        RowStatus::NotFound => PLACEHOLDER.to_string(),
    }
}

fn display_link(row: &ComparisonRow) -> &str {
    match row.status {
        RowStatus::NotFound => PLACEHOLDER,
        _ => row.result.url.as_deref().unwrap_or(PLACEHOLDER),
    }
}

/// Escapes pipes so a value stays inside its markdown table cell.
fn md_escape(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Truncates on character boundaries, appending "..." when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
