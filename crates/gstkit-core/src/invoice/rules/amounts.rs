//! Invoice total extraction.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::TOTAL;
use super::{ExtractionMatch, FieldExtractor};

/// Total amount extractor; matches "total"/"amount" followed by a number.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        TOTAL
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let value = parse_amount(m.as_str())?;
                Some(ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// Extract the invoice total.
pub fn extract_total(text: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

/// Parse an amount written with thousands separators (`1,18,000.50`).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim_end_matches('.');
    Decimal::from_str(cleaned).ok()
}
