//! Invoice date extraction.

use chrono::NaiveDate;

use super::patterns::{DATE_NUMERIC, DATE_TEXTUAL};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// The value is the date as written; use [`normalize_date`] for a calendar
/// date.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// All dates in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = DATE_TEXTUAL
            .find_iter(text)
            .chain(DATE_NUMERIC.find_iter(text))
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect();

        results.sort_by_key(|m| m.position);
        results
    }
}

/// Parse an extracted date (`12 mar 2025`, `12/03/2025`, `12-3-25`).
///
/// Day comes first. Two-digit years are taken as 20xx.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_TEXTUAL.captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_to_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = DATE_NUMERIC.captures(raw)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if s.len() == 2 { 2000 + year } else { year })
}

fn month_to_number(month: &str) -> Option<u32> {
    let month = match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_normalize_textual_dates() {
        assert_eq!(normalize_date("12 mar 2025"), date(2025, 3, 12));
        assert_eq!(normalize_date("5 September 2024"), date(2024, 9, 5));
        assert_eq!(normalize_date("1jan2026"), date(2026, 1, 1));
    }

    #[test]
    fn test_normalize_numeric_dates() {
        assert_eq!(normalize_date("12/03/2025"), date(2025, 3, 12));
        assert_eq!(normalize_date("1-4-25"), date(2025, 4, 1));
        assert_eq!(normalize_date("31/02/2025"), None);
        assert_eq!(normalize_date("Unknown"), None);
    }

    #[test]
    fn test_extract_in_text_order() {
        let text = "due 15/04/2025, issued 12 mar 2025";
        let dates: Vec<String> = DateExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(dates, vec!["15/04/2025", "12 mar 2025"]);
    }
}
