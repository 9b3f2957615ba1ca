//! HTTP access to the rate page and rate files.

use std::time::Duration;

use tracing::{debug, info};

use super::links::{extract_rate_links, RateLink};
use super::Result;
use crate::error::SourceError;
use crate::models::config::SourceConfig;

/// Client for the configured rate page.
pub struct RateSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl RateSource {
    /// Build a client from source configuration.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch the rate page HTML.
    pub async fn fetch_page(&self) -> Result<String> {
        let url = &self.config.page_url;
        debug!("Fetching rate page {}", url);

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.page_timeout_secs))
            .send()
            .await?;
        check_status(&response, url)?;

        Ok(response.text().await?)
    }

    /// All rate file candidates on the page, in document order.
    pub async fn candidates(&self) -> Result<Vec<RateLink>> {
        let html = self.fetch_page().await?;
        extract_rate_links(&html, &self.config.base_url)
    }

    /// The first rate file candidate on the page.
    pub async fn locate(&self) -> Result<RateLink> {
        let link = self
            .candidates()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NoRateFile(self.config.page_url.clone()))?;

        info!("Located rate file {} ({})", link.url, link.format);
        Ok(link)
    }

    /// Download a rate file.
    pub async fn download(&self, link: &RateLink) -> Result<Vec<u8>> {
        debug!("Downloading rate file {}", link.url);

        let response = self
            .client
            .get(&link.url)
            .timeout(Duration::from_secs(self.config.file_timeout_secs))
            .send()
            .await?;
        check_status(&response, &link.url)?;

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

fn check_status(response: &reqwest::Response, url: &str) -> Result<()> {
    if !response.status().is_success() {
        return Err(SourceError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}
