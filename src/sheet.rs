//! Raw sheet access: fetch and time-based memoization
//!
//! The raw CSV export is the only cacheable resource in the pipeline. It is
//! memoized per source id with a time-based expiry; concurrent cold-cache
//! requests may redundantly re-fetch, which is acceptable — there is no
//! single-flight requirement at these data sizes.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Default cache lifetime, matching the dashboard's refresh cadence.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CachedSheet {
    body: String,
    fetched_at: Instant,
}

/// TTL-memoized store of raw CSV documents, keyed by source id.
pub struct SheetCache {
    ttl: Duration,
    entries: HashMap<String, CachedSheet>,
}

impl SheetCache {
    pub fn new(ttl: Duration) -> SheetCache {
        SheetCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Return the cached document for `source_id`, or run `load` and cache
    /// its result when the entry is missing or expired.
    pub fn get_or_load(
        &mut self,
        source_id: &str,
        load: impl FnOnce() -> Result<String>,
    ) -> Result<&str> {
        let expired = self
            .entries
            .get(source_id)
            .is_none_or(|c| c.fetched_at.elapsed() >= self.ttl);

        if expired {
            log::info!("Fetching sheet '{}'", source_id);
            let body = load()?;
            self.entries.insert(
                source_id.to_string(),
                CachedSheet {
                    body,
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(&self.entries[source_id].body)
    }

    /// Drop a cached entry, forcing the next access to re-fetch.
    pub fn invalidate(&mut self, source_id: &str) {
        self.entries.remove(source_id);
    }
}

impl Default for SheetCache {
    fn default() -> Self {
        SheetCache::new(DEFAULT_TTL)
    }
}

/// Fetch a sheet's CSV export over HTTP.
pub fn fetch_csv(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to fetch sheet from {}", url))?;
    if !response.status().is_success() {
        anyhow::bail!("Sheet fetch returned HTTP {} for {}", response.status(), url);
    }
    response.text().context("Failed to read sheet response body")
}

/// Read a locally exported CSV snapshot.
pub fn load_csv(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cache_hits_within_ttl() {
        let mut cache = SheetCache::new(Duration::from_secs(60));
        let mut loads = 0;
        for _ in 0..3 {
            let body = cache
                .get_or_load("appearances", || {
                    loads += 1;
                    Ok("Show,Episode\n".to_string())
                })
                .unwrap();
            assert_eq!(body, "Show,Episode\n");
        }
        assert_eq!(loads, 1);
    }

    #[test]
    fn test_cache_expires() {
        let mut cache = SheetCache::new(Duration::ZERO);
        let mut loads = 0;
        for _ in 0..2 {
            cache
                .get_or_load("appearances", || {
                    loads += 1;
                    Ok(String::new())
                })
                .unwrap();
        }
        assert_eq!(loads, 2);
    }

    #[test]
    fn test_cache_keys_are_independent() {
        let mut cache = SheetCache::new(Duration::from_secs(60));
        cache.get_or_load("a", || Ok("first".to_string())).unwrap();
        let b = cache.get_or_load("b", || Ok("second".to_string())).unwrap();
        assert_eq!(b, "second");
        let a = cache.get_or_load("a", || panic!("should be cached")).unwrap();
        assert_eq!(a, "first");
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut cache = SheetCache::new(Duration::from_secs(60));
        cache.get_or_load("a", || Ok("v1".to_string())).unwrap();
        cache.invalidate("a");
        let body = cache.get_or_load("a", || Ok("v2".to_string())).unwrap();
        assert_eq!(body, "v2");
    }

    #[test]
    fn test_load_csv_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Show,Episode").unwrap();
        let body = load_csv(&path).unwrap();
        assert!(body.starts_with("Show,Episode"));
    }

    #[test]
    fn test_load_csv_missing_file() {
        assert!(load_csv(Path::new("/nonexistent/sheet.csv")).is_err());
    }
}
