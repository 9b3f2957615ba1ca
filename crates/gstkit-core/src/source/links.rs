//! Rate file link discovery in the CBIC rates page.

use std::collections::HashSet;

use reqwest::Url;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, trace};

use super::Result;
use crate::error::SourceError;
use crate::models::rates::RateFileFormat;

/// A candidate rate file found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLink {
    /// Absolute URL of the file.
    pub url: String,
    /// Format implied by the file extension.
    pub format: RateFileFormat,
}

/// Collect links to rate files, in document order.
///
/// A link qualifies when its href mentions "rate" and its path ends in
/// `.xlsx`, `.xls` or `.pdf`. Relative hrefs are resolved against `base_url`.
pub fn extract_rate_links(html: &str, base_url: &str) -> Result<Vec<RateLink>> {
    let base = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    let doc = Html::parse_document(html);
    let anchors = create_selector("a[href]")?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !href.to_lowercase().contains("rate") {
            continue;
        }

        let url = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                trace!("Skipping unresolvable href {:?}: {}", href, e);
                continue;
            }
        };

        let Some(format) = RateFileFormat::from_name(url.path()) else {
            continue;
        };

        if seen.insert(url.to_string()) {
            links.push(RateLink {
                url: url.to_string(),
                format,
            });
        }
    }

    debug!("Found {} rate file candidates", links.len());
    Ok(links)
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|e| SourceError::InvalidUrl {
        url: sel_str.to_string(),
        reason: format!("bad selector: {}", e),
    })
}
