//! Rule-based field extractors for GST invoices.

pub mod amounts;
pub mod dates;
pub mod gstin;
pub mod patterns;
pub mod rates;

pub use amounts::{extract_total, parse_amount, AmountExtractor};
pub use dates::{normalize_date, DateExtractor};
pub use gstin::{extract_gstin, validate_gstin, GstinExtractor};
pub use patterns::*;
pub use rates::{extract_gst_rate, RateExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
