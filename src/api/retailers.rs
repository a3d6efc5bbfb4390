//! Retailers covered by the price service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supermarkets the scraping service queries on every product search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Retailer {
    Jumbo,
    SantaIsabel,
    Lider,
}

impl Retailer {
    /// Returns the human-readable store name.
    pub fn name(&self) -> &'static str {
        match self {
            Retailer::Jumbo => "Jumbo",
            Retailer::SantaIsabel => "Santa Isabel",
            Retailer::Lider => "Líder",
        }
    }

    /// Returns the retailer's web domain.
    pub fn domain(&self) -> &'static str {
        match self {
            Retailer::Jumbo => "jumbo.cl",
            Retailer::SantaIsabel => "santaisabel.cl",
            Retailer::Lider => "lider.cl",
        }
    }

    /// Returns all known retailers in the order the service reports them.
    pub fn all() -> &'static [Retailer] {
        &[Retailer::Jumbo, Retailer::SantaIsabel, Retailer::Lider]
    }

    /// Resolves a service identifier to a display name, falling back to the raw id.
    pub fn display_name(id: &str) -> String {
        id.parse::<Retailer>().map(|r| r.name().to_string()).unwrap_or_else(|_| id.to_string())
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Retailer::Jumbo => "jumbo",
            Retailer::SantaIsabel => "santa-isabel",
            Retailer::Lider => "lider",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Retailer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == 'í' { 'i' } else { c })
            .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
            .collect();

        match key.as_str() {
            "jumbo" | "jumbocl" => Ok(Retailer::Jumbo),
            "santaisabel" | "santaisabelcl" => Ok(Retailer::SantaIsabel),
            "lider" | "lidercl" => Ok(Retailer::Lider),
            _ => Err(format!("Unknown retailer: {}", s)),
        }
    }
}
