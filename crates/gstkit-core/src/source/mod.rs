//! Locating and downloading the published GST rate file.

mod client;
mod links;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::RateSource;
pub use links::{extract_rate_links, RateLink};

use crate::error::SourceError;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
