//! On-disk rate cache and keyword lookup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::models::rates::RateTable;
use crate::source::RateSource;
use crate::tables::parse_rate_file;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Whether a cache exists and how many entries it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    pub has_cache: bool,
    pub items: usize,
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshReport {
    pub ok: bool,
    pub count: usize,
    /// URL the table was downloaded from.
    pub source: String,
}

/// Result of a keyword lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLookup {
    pub keyword: String,
    pub rate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_key: Option<String>,
}

/// JSON rate table persisted at a fixed path.
#[derive(Debug, Clone)]
pub struct RateCache {
    path: PathBuf,
}

impl RateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached table; `None` when no cache file exists.
    pub fn load(&self) -> Result<Option<RateTable>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let table = serde_json::from_str(&content).map_err(|source| CacheError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(Some(table))
    }

    /// Write the table, replacing any previous cache atomically.
    pub fn save(&self, table: &RateTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let content = serde_json::to_string_pretty(table).map_err(|source| CacheError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|source| self.io_error(source))?;
        fs::rename(&temp_path, &self.path).map_err(|source| self.io_error(source))?;

        debug!("Saved {} entries to {}", table.len(), self.path.display());
        Ok(())
    }

    pub fn status(&self) -> Result<CacheStatus> {
        let items = self.load()?.map(|t| t.len());
        Ok(CacheStatus {
            has_cache: items.is_some(),
            items: items.unwrap_or(0),
        })
    }

    /// Locate, download and parse the published rate file, then save it.
    ///
    /// The existing cache is left untouched on any failure.
    pub async fn refresh(&self, source: &RateSource) -> Result<RefreshReport> {
        let link = source
            .locate()
            .await
            .map_err(|e| CacheError::Refresh(e.to_string()))?;
        let content = source
            .download(&link)
            .await
            .map_err(|e| CacheError::Refresh(e.to_string()))?;

        let format = link.format;
        let table = tokio::task::spawn_blocking(move || parse_rate_file(&content, format))
            .await
            .map_err(|e| CacheError::Refresh(format!("parser task failed: {}", e)))?
            .map_err(|e| CacheError::Refresh(e.to_string()))?;

        self.save(&table)?;
        info!("Cached {} rates from {}", table.len(), link.url);

        Ok(RefreshReport {
            ok: true,
            count: table.len(),
            source: link.url,
        })
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Find the rate for a keyword or HSN code.
///
/// An exact key wins; otherwise the first entry, in key order, whose
/// description contains the keyword. Matching ignores case and surrounding
/// whitespace; the keyword is echoed back as given. Falls back to
/// `"<default>% (default)"`.
pub fn lookup(table: &RateTable, keyword: &str, default_rate: u32) -> RateLookup {
    let needle = keyword.trim().to_lowercase();

    let hit = if needle.is_empty() {
        None
    } else {
        table
            .get(&needle)
            .map(|entry| (needle.clone(), entry))
            .or_else(|| {
                table
                    .iter()
                    .find(|(_, entry)| entry.description.contains(&needle))
                    .map(|(key, entry)| (key.clone(), entry))
            })
    };

    match hit {
        Some((key, entry)) => RateLookup {
            keyword: keyword.to_string(),
            rate: entry.rate.clone(),
            matched_key: Some(key),
        },
        None => RateLookup {
            keyword: keyword.to_string(),
            rate: format!("{}% (default)", default_rate),
            matched_key: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::SourceConfig;
    use crate::models::rates::RateEntry;
    use crate::source::test_server::TestServer;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_table() -> RateTable {
        let mut table = RateTable::new();
        table.insert("8471", RateEntry::new("automatic data processing machines", "18%"));
        table.insert("0401", RateEntry::new("fresh milk", "0%"));
        table.insert("restaurant service", RateEntry::new("restaurant service", "5%"));
        table
    }

    #[test]
    fn test_missing_cache() {
        let dir = TempDir::new().unwrap();
        let cache = RateCache::new(dir.path().join("rates.json"));

        assert_eq!(cache.load().unwrap(), None);
        assert_eq!(
            cache.status().unwrap(),
            CacheStatus {
                has_cache: false,
                items: 0
            }
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = RateCache::new(dir.path().join("nested").join("rates.json"));
        let table = sample_table();

        cache.save(&table).unwrap();
        assert_eq!(cache.load().unwrap(), Some(table));
        assert_eq!(cache.status().unwrap().items, 3);
        assert!(!dir.path().join("nested").join("rates.json.tmp").exists());
    }

    #[test]
    fn test_malformed_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = RateCache::new(path).load();
        assert!(matches!(result, Err(CacheError::Malformed { .. })));
    }

    fn rates_workbook(rows: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "HSN Code").unwrap();
        sheet.write_string(0, 1, "Description").unwrap();
        sheet.write_string(0, 2, "Rate").unwrap();
        for (i, (code, description, rate)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *code).unwrap();
            sheet.write_string(row, 1, *description).unwrap();
            sheet.write_string(row, 2, *rate).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    async fn source_serving(file: Vec<u8>) -> (TestServer, RateSource) {
        let page = br#"<a href="/files/GST_Rates.xlsx">Rates</a>"#.to_vec();
        let server = TestServer::start(vec![
            ("/rates.html", page),
            ("/files/GST_Rates.xlsx", file),
        ])
        .await;
        let source = RateSource::new(SourceConfig {
            page_url: server.url("/rates.html"),
            base_url: server.base().to_string(),
            page_timeout_secs: 5,
            file_timeout_secs: 5,
            ..SourceConfig::default()
        })
        .unwrap();
        (server, source)
    }

    #[tokio::test]
    async fn test_refresh_downloads_and_saves() {
        let file = rates_workbook(&[("8471", "Computers", "18%"), ("0401", "Fresh milk", "0%")]);
        let (server, source) = source_serving(file).await;
        let dir = TempDir::new().unwrap();
        let cache = RateCache::new(dir.path().join("rates.json"));

        let report = cache.refresh(&source).await.unwrap();
        assert_eq!(
            report,
            RefreshReport {
                ok: true,
                count: 2,
                source: server.url("/files/GST_Rates.xlsx"),
            }
        );

        let table = cache.load().unwrap().unwrap();
        assert_eq!(table.get("8471"), Some(&RateEntry::new("computers", "18%")));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_cache() {
        let dir = TempDir::new().unwrap();
        let cache = RateCache::new(dir.path().join("rates.json"));
        cache.save(&sample_table()).unwrap();

        // header only: parses to an empty table
        let (_server, source) = source_serving(rates_workbook(&[])).await;
        let result = cache.refresh(&source).await;
        assert!(matches!(result, Err(CacheError::Refresh(_))));
        assert_eq!(cache.load().unwrap(), Some(sample_table()));

        let (server, _) = source_serving(Vec::new()).await;
        let missing = RateSource::new(SourceConfig {
            page_url: server.url("/gone.html"),
            base_url: server.base().to_string(),
            ..SourceConfig::default()
        })
        .unwrap();
        assert!(matches!(cache.refresh(&missing).await, Err(CacheError::Refresh(_))));
        assert_eq!(cache.load().unwrap(), Some(sample_table()));
    }

    #[test]
    fn test_lookup_exact_key() {
        let result = lookup(&sample_table(), " 8471 ", 18);
        assert_eq!(result.rate, "18%");
        assert_eq!(result.keyword, " 8471 ");
        assert_eq!(result.matched_key.as_deref(), Some("8471"));
    }

    #[test]
    fn test_lookup_description_substring() {
        let result = lookup(&sample_table(), "Milk", 18);
        assert_eq!(result.keyword, "Milk");
        assert_eq!(result.rate, "0%");
        assert_eq!(result.matched_key.as_deref(), Some("0401"));
    }

    #[test]
    fn test_lookup_first_match_in_key_order() {
        let mut table = RateTable::new();
        table.insert("2202", RateEntry::new("aerated water", "28%"));
        table.insert("2201", RateEntry::new("mineral water", "18%"));

        assert_eq!(lookup(&table, "water", 18).rate, "18%");
    }

    #[test]
    fn test_lookup_default() {
        let result = lookup(&sample_table(), "spacecraft", 18);
        assert_eq!(result.rate, "18% (default)");
        assert_eq!(result.matched_key, None);

        assert_eq!(lookup(&RateTable::new(), "", 12).rate, "12% (default)");
    }

    #[test]
    fn test_lookup_serialises_without_missing_key() {
        let json = serde_json::to_value(lookup(&RateTable::new(), "x", 18)).unwrap();
        assert_eq!(json, serde_json::json!({"keyword": "x", "rate": "18% (default)"}));
    }
}
