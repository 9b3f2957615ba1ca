//! GST rate extraction ("18 percent", "12%").

use super::patterns::GST_RATE;
use super::{ExtractionMatch, FieldExtractor};

/// GST rate extractor.
pub struct RateExtractor;

impl RateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RateExtractor {
    type Output = ExtractionMatch<u32>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        GST_RATE
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let rate: u32 = caps[1].parse().ok()?;
                Some(
                    ExtractionMatch::new(rate, full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// Extract the first GST rate in percent.
pub fn extract_gst_rate(text: &str) -> Option<u32> {
    RateExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_gst_rate() {
        assert_eq!(extract_gst_rate("charged at 18 percent"), Some(18));
        assert_eq!(extract_gst_rate("gst 12%"), Some(12));
        assert_eq!(extract_gst_rate("5 % igst and 28% cess"), Some(5));
        assert_eq!(extract_gst_rate("no rate given"), None);
    }

    #[test]
    fn test_extract_all_rates() {
        let rates: Vec<u32> = RateExtractor::new()
            .extract_all("cgst 9% sgst 9% igst 0%")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(rates, vec![9, 9, 0]);
    }
}
