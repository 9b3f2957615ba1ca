//! GST rate table models.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single rate table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Lowercased goods/service description (may be empty for code-only rows).
    pub description: String,

    /// Rate as published, normalised to `"NN%"`.
    pub rate: String,
}

impl RateEntry {
    pub fn new(description: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            rate: rate.into(),
        }
    }

    /// Numeric percentage of this entry's rate.
    pub fn percent(&self) -> Option<Decimal> {
        parse_percent(&self.rate)
    }
}

/// Mapping from HSN/SAC code (or lowercased description) to rate entry.
///
/// Serialises as a flat JSON object, which is also the cache file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    entries: BTreeMap<String, RateEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a later insert under the same key replaces the earlier one.
    pub fn insert(&mut self, key: impl Into<String>, entry: RateEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&RateEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RateEntry)> {
        self.entries.iter()
    }

    /// Merge another table in; its entries win on key collisions.
    pub fn extend(&mut self, other: RateTable) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(String, RateEntry)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, RateEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Published rate file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateFileFormat {
    Xlsx,
    Xls,
    Pdf,
}

impl RateFileFormat {
    /// Detect the format from a URL or file name by its extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let path = name.split(['?', '#']).next().unwrap_or(name);
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        ext.parse().ok()
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, RateFileFormat::Xlsx | RateFileFormat::Xls)
    }
}

impl FromStr for RateFileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "xlsx" => Ok(RateFileFormat::Xlsx),
            "xls" => Ok(RateFileFormat::Xls),
            "pdf" => Ok(RateFileFormat::Pdf),
            other => Err(format!("unsupported rate file format: {}", other)),
        }
    }
}

impl fmt::Display for RateFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateFileFormat::Xlsx => write!(f, "xlsx"),
            RateFileFormat::Xls => write!(f, "xls"),
            RateFileFormat::Pdf => write!(f, "pdf"),
        }
    }
}

/// Parse the leading number of a rate string such as `"18%"` or `"18% (default)"`.
pub fn parse_percent(rate: &str) -> Option<Decimal> {
    let number: String = rate
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(number.trim_end_matches('.')).ok()
}

/// Render a percentage the way the rate table stores it.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_serialises_as_flat_object() {
        let mut table = RateTable::new();
        table.insert("8471", RateEntry::new("automatic data processing machines", "18%"));
        table.insert("8471", RateEntry::new("computers", "18%"));

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"8471": {"description": "computers", "rate": "18%"}})
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            RateFileFormat::from_name("https://x/rates/goods.XLSX"),
            Some(RateFileFormat::Xlsx)
        );
        assert_eq!(RateFileFormat::from_name("/tmp/Rates.xls"), Some(RateFileFormat::Xls));
        assert_eq!(RateFileFormat::from_name("rate-list.pdf?v=2"), Some(RateFileFormat::Pdf));
        assert_eq!(RateFileFormat::from_name("rates.html"), None);
        assert_eq!(RateFileFormat::from_name("rates"), None);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("18%"), Some(Decimal::from(18)));
        assert_eq!(parse_percent("18% (default)"), Some(Decimal::from(18)));
        assert_eq!(parse_percent("0.25%"), Some(Decimal::new(25, 2)));
        assert_eq!(parse_percent("nil"), None);
        assert_eq!(format_percent(Decimal::new(250, 2)), "2.5%");
    }
}
