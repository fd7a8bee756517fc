//! Episode sheet: streaming links for "watch now" affordances
//!
//! A second sheet lists one row per (show, episode) with an optional
//! streaming URL. Appearance rows are left-joined against it; an absent link
//! renders as empty, not an error.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const COL_SHOW: &str = "Show";
const COL_EPISODE: &str = "Episode";
const COL_STREAMING_LINK: &str = "Streaming_link";

const BBC_ICON: &str = "https://iplayer-web.files.bbci.co.uk/page-builder/51.0.0/img/icons/favicon.ico";
const NETFLIX_ICON: &str = "https://assets.nflxext.com/ffe/siteui/common/icons/nficon2016.ico";

/// Streaming links keyed by `(show, episode)`.
#[derive(Debug, Default, Clone)]
pub struct EpisodeIndex {
    links: HashMap<(String, String), String>,
}

impl EpisodeIndex {
    /// Load the episode sheet. `Show` and `Episode` columns are required;
    /// a missing `Streaming_link` column just yields an index with no links.
    pub fn load<R: Read>(reader: &mut csv::Reader<R>) -> Result<EpisodeIndex> {
        let headers = reader.headers().context("Failed to read header row")?.clone();
        let find = |name: &str| headers.iter().position(|h| h == name);

        let show_col = find(COL_SHOW)
            .ok_or_else(|| anyhow::anyhow!("Missing required column '{}' in episode sheet", COL_SHOW))?;
        let episode_col = find(COL_EPISODE).ok_or_else(|| {
            anyhow::anyhow!("Missing required column '{}' in episode sheet", COL_EPISODE)
        })?;
        let link_col = find(COL_STREAMING_LINK);

        let mut links = HashMap::new();
        for result in reader.records() {
            let record = result.context("Failed to read CSV row")?;
            let show = record.get(show_col).unwrap_or("").trim();
            let episode = record.get(episode_col).unwrap_or("").trim();
            let link = link_col.and_then(|i| record.get(i)).unwrap_or("").trim();
            if show.is_empty() || episode.is_empty() || link.is_empty() {
                continue;
            }
            links.insert((show.to_string(), episode.to_string()), link.to_string());
        }

        Ok(EpisodeIndex { links })
    }

    /// Load the episode sheet from an in-memory CSV document.
    pub fn from_csv_str(csv_data: &str) -> Result<EpisodeIndex> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        EpisodeIndex::load(&mut reader)
    }

    /// Load the episode sheet from a local CSV snapshot.
    pub fn from_csv_path(path: &Path) -> Result<EpisodeIndex> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open episode CSV {}", path.display()))?;
        EpisodeIndex::load(&mut reader)
    }

    /// Streaming link for an episode, if one is known.
    pub fn link_for(&self, show: &str, episode: &str) -> Option<&str> {
        self.links
            .get(&(show.to_string(), episode.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Provider favicon for a watch-now link. BBC links get the iPlayer icon,
/// everything else the Netflix icon.
pub fn watch_icon(url: &str) -> &'static str {
    if url.contains("bbc") {
        BBC_ICON
    } else {
        NETFLIX_ICON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let csv = "Show,Episode,Streaming_link\n\
Dynasties,Lion,https://www.bbc.co.uk/iplayer/episode/1\n\
Our Planet,Jungles,https://www.netflix.com/watch/2\n\
Dynasties,Chimpanzee,";
        let index = EpisodeIndex::from_csv_str(csv).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.link_for("Dynasties", "Lion"),
            Some("https://www.bbc.co.uk/iplayer/episode/1")
        );
        // Absent link is absent, not an error
        assert_eq!(index.link_for("Dynasties", "Chimpanzee"), None);
        assert_eq!(index.link_for("Dynasties", "Unaired"), None);
    }

    #[test]
    fn test_missing_link_column_is_tolerated() {
        let csv = "Show,Episode\nDynasties,Lion";
        let index = EpisodeIndex::from_csv_str(csv).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_show_column_is_fatal() {
        let csv = "Episode,Streaming_link\nLion,https://example.com";
        assert!(EpisodeIndex::from_csv_str(csv).is_err());
    }

    #[test]
    fn test_watch_icon_selection() {
        assert!(watch_icon("https://www.bbc.co.uk/iplayer/x").contains("bbci"));
        assert!(watch_icon("https://www.netflix.com/watch/2").contains("nflx"));
    }
}
