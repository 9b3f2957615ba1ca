//! GSTIN (GST Identification Number) extraction and validation.

use super::patterns::GSTIN;
use super::{ExtractionMatch, FieldExtractor};

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// GSTIN field extractor.
pub struct GstinExtractor {
    validate: bool,
}

impl GstinExtractor {
    /// Create a new GSTIN extractor; checksums are not validated by default.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to validate GSTIN check characters.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for GstinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for caps in GSTIN.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let gstin = m.as_str().to_uppercase();

            if self.validate && !validate_gstin(&gstin) {
                continue;
            }
            if results.iter().any(|r| r.value == gstin) {
                continue;
            }

            results.push(
                ExtractionMatch::new(gstin, m.as_str()).with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Extract the first GSTIN from text, uppercased.
pub fn extract_gstin(text: &str) -> Option<String> {
    GstinExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a GSTIN's check character.
///
/// Mod-36 over the first 14 characters with factors alternating 1, 2; each
/// product contributes its base-36 quotient plus remainder.
pub fn validate_gstin(gstin: &str) -> bool {
    let bytes = gstin.trim().to_uppercase().into_bytes();
    if bytes.len() != 15 {
        return false;
    }

    let mut sum = 0u32;
    for (i, b) in bytes[..14].iter().enumerate() {
        let Some(value) = CHARSET.iter().position(|c| c == b) else {
            return false;
        };
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value as u32 * factor;
        sum += product / 36 + product % 36;
    }

    let check = ((36 - sum % 36) % 36) as usize;
    CHARSET[check] == bytes[14]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_gstin_valid() {
        assert!(validate_gstin("27AAPFU0939F1ZV"));
        assert!(validate_gstin("33aaach7409r1z8"));
    }

    #[test]
    fn test_validate_gstin_invalid() {
        assert!(!validate_gstin("29AABCU9603R1ZM")); // wrong check character
        assert!(!validate_gstin("27AAPFU0939F1Z")); // too short
        assert!(!validate_gstin("27AAPFU0939F1Z#"));
    }

    #[test]
    fn test_extract_gstin_uppercases() {
        assert_eq!(
            extract_gstin("supplier gstin: 27aapfu0939f1zv, state maharashtra"),
            Some("27AAPFU0939F1ZV".to_string())
        );
        assert_eq!(extract_gstin("no identifier here"), None);
    }

    #[test]
    fn test_extract_full_gstin_in_context() {
        let expected = Some("27AAPFU0939F1ZV".to_string());
        assert_eq!(extract_gstin("gstin 27aapfu0939f1zv total 500"), expected);
        assert_eq!(extract_gstin("GSTIN27AAPFU0939F1ZV total 500"), expected);
        assert_eq!(extract_gstin("registered as 27AAPFU0939F1ZV."), expected);
        assert_eq!(extract_gstin("(27aapfu0939f1zv)"), expected);
    }

    #[test]
    fn test_extracted_gstin_can_be_validated() {
        let m = GstinExtractor::new()
            .with_validation(true)
            .extract("gstin27aapfu0939f1zv")
            .unwrap();
        assert_eq!(m.value.len(), 15);
        assert_eq!(m.position, Some((5, 20)));
    }

    #[test]
    fn test_validation_skips_bad_checksums() {
        let text = "gstin 29aabcu9603r1zm buyer gstin 33aaach7409r1z8";

        let all = GstinExtractor::new().extract_all(text);
        assert_eq!(all.len(), 2);

        let valid = GstinExtractor::new().with_validation(true).extract(text);
        assert_eq!(valid.map(|m| m.value), Some("33AAACH7409R1Z8".to_string()));
    }
}
