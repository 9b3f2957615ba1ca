//! Rate tables from the text layer of a rate PDF.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::Result;
use crate::models::rates::{format_percent, RateEntry, RateTable};
use crate::pdf::PdfExtractor;

lazy_static! {
    static ref ROW_WITH_CODE: Regex = Regex::new(
        r"\b(\d{4,8})\b\s+(.+?)\s+(\d{1,2}(?:\.\d+)?)\s*%$"
    ).unwrap();

    static ref ROW_WITH_DESCRIPTION: Regex = Regex::new(
        r"^(.+?)\s+(\d{1,2}(?:\.\d+)?)\s*%$"
    ).unwrap();

    static ref SLAB_HEADING: Regex = Regex::new(
        r"\b(0|5|12|18|28)\s*%"
    ).unwrap();

    static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
}

/// Slab rates in heading priority order; a later slab on the line wins.
const SLABS: [&str; 5] = ["0", "5", "12", "18", "28"];

/// Parse a rate PDF.
pub fn parse_pdf(content: &[u8]) -> Result<RateTable> {
    let extractor = PdfExtractor::from_bytes(content)?;
    let pages = extractor.pages_text()?;
    debug!("Extracted text from {} PDF pages", pages.len());
    Ok(parse_rate_text(&pages.join("\n")))
}

/// Parse rate rows out of extracted PDF text.
///
/// Falls back to the section-heading layout when no row matches.
pub fn parse_rate_text(text: &str) -> RateTable {
    let table = parse_rows(text);
    if !table.is_empty() {
        return table;
    }

    debug!("No rate rows matched, trying section headings");
    parse_sections(text)
}

fn parse_rows(text: &str) -> RateTable {
    let mut table = RateTable::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = ROW_WITH_CODE.captures(line) {
            let Some(rate) = rate_from(&caps[3]) else {
                continue;
            };
            table.insert(&caps[1], RateEntry::new(caps[2].trim().to_lowercase(), rate));
        } else if let Some(caps) = ROW_WITH_DESCRIPTION.captures(line) {
            let Some(rate) = rate_from(&caps[2]) else {
                continue;
            };
            let description = caps[1].trim().to_lowercase();
            table.insert(description.clone(), RateEntry::new(description, rate));
        }
    }
    table
}

/// Lines under a heading like "Goods taxed at 12%" inherit that rate.
fn parse_sections(text: &str) -> RateTable {
    let mut table = RateTable::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains('%') {
            let slab = SLAB_HEADING
                .captures_iter(line)
                .filter_map(|caps| SLABS.iter().position(|s| *s == &caps[1]))
                .max();
            if let Some(index) = slab {
                current = rate_from(SLABS[index]);
            }
            continue;
        }

        if let Some(rate) = &current {
            if HAS_LETTER.is_match(line) {
                let description = line.to_lowercase();
                table.insert(description.clone(), RateEntry::new(description, rate.clone()));
            }
        }
    }
    table
}

fn rate_from(number: &str) -> Option<String> {
    Decimal::from_str(number).ok().map(format_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_rows_and_description_rows() {
        let text = "\
            Schedule of rates\n\
            8471 Automatic data processing machines 18%\n\
            0401   Fresh milk and cream   0 %\n\
            Restaurant service 5%\n\
            Page 1 of 20\n";

        let table = parse_rate_text(text);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get("8471"),
            Some(&RateEntry::new("automatic data processing machines", "18%"))
        );
        assert_eq!(table.get("0401"), Some(&RateEntry::new("fresh milk and cream", "0%")));
        assert_eq!(
            table.get("restaurant service"),
            Some(&RateEntry::new("restaurant service", "5%"))
        );
    }

    #[test]
    fn test_fractional_rate_is_kept() {
        let table = parse_rate_text("7102 Rough diamonds 0.25%");
        assert_eq!(table.get("7102").map(|e| e.rate.as_str()), Some("0.25%"));
    }

    #[test]
    fn test_section_heading_fallback() {
        let text = "\
            Goods taxed at 5% or 12% (Schedule II)\n\
            Footwear\n\
            Packaged paneer\n\
            ----\n\
            Schedule IV - 28% slab\n\
            Aerated water\n";

        let table = parse_rate_text(text);
        assert_eq!(table.get("footwear").map(|e| e.rate.as_str()), Some("12%"));
        assert_eq!(table.get("packaged paneer").map(|e| e.rate.as_str()), Some("12%"));
        assert_eq!(table.get("aerated water").map(|e| e.rate.as_str()), Some("28%"));
        assert!(table.get("----").is_none());
    }

    #[test]
    fn test_section_heading_prefers_higher_slab() {
        let table = parse_rate_text("Schedule: 28% and 5% items\nLuxury cars\n");
        assert_eq!(table.get("luxury cars").map(|e| e.rate.as_str()), Some("28%"));
    }

    #[test]
    fn test_lines_before_any_heading_are_ignored() {
        let table = parse_rate_text("Introduction\nGeneral notes\n");
        assert!(table.is_empty());
    }
}
