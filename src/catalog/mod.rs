// Track catalog - the fixed, read-only song list everything else draws from
//
// Loaded once at startup (built-in demo set or a JSON file) and shared
// behind an Arc. Nothing mutates it after construction.

pub mod demo;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Number of tracks shown when the search box is empty
pub const BROWSE_LIMIT: usize = 12;

/// A playable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork_url: String,
    pub artwork_hint: String,
    pub preview_url: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate track id '{0}' in catalog")]
    DuplicateId(String),
}

pub struct Catalog {
    tracks: Vec<Arc<Track>>,
    /// title -> index of its first occurrence
    by_title: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, preserving the given order. Track ids must be unique.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.id.as_str()) {
                return Err(CatalogError::DuplicateId(track.id.clone()));
            }
        }
        Ok(Self::build(tracks))
    }

    /// The built-in twelve-track demo catalog
    pub fn demo() -> Self {
        Self::build(demo::tracks())
    }

    fn build(tracks: Vec<Track>) -> Self {
        let mut by_title = HashMap::with_capacity(tracks.len());
        let mut by_id = HashMap::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            by_id.insert(track.id.clone(), index);
            by_title.entry(track.title.clone()).or_insert(index);
        }

        Self {
            tracks: tracks.into_iter().map(Arc::new).collect(),
            by_title,
            by_id,
        }
    }

    /// Load a catalog from a JSON array of tracks
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let tracks: Vec<Track> = serde_json::from_str(&contents)?;
        Self::new(tracks)
    }

    pub fn list_tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All titles in catalog order
    pub fn titles(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.title.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Track>> {
        self.by_id.get(id).map(|&i| &self.tracks[i])
    }

    /// Exact, case-sensitive title lookup. With repeated titles the first
    /// catalog entry wins.
    pub fn find_by_title(&self, title: &str) -> Option<&Arc<Track>> {
        self.by_title.get(title).map(|&i| &self.tracks[i])
    }

    /// Case-insensitive substring match on title or artist.
    /// An empty term returns the first `BROWSE_LIMIT` tracks.
    pub fn search(&self, term: &str) -> Vec<Arc<Track>> {
        if term.is_empty() {
            return self.tracks.iter().take(BROWSE_LIMIT).cloned().collect();
        }

        let needle = term.to_lowercase();
        self.tracks
            .iter()
            .filter(|track| {
                track.title.to_lowercase().contains(&needle)
                    || track.artist.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}
