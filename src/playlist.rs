// AI playlist orchestration
//
// validate -> compile prompt -> one generation call -> join titles back to
// the catalog. Stateless between calls; the catalog is injected read-only.

use std::sync::Arc;
use thiserror::Error;

use crate::ai::{
    compile_instruction, GenerationClient, GenerationError, PlaylistRequest, ValidationError,
};
use crate::catalog::{Catalog, Track};

/// Message shown to the user for any generation failure
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate playlist. Please try again.";

/// Shown when generation succeeded but nothing matched the catalog
pub const EMPTY_PLAYLIST_MESSAGE: &str =
    "We couldn't generate a playlist with that criteria. Try being more specific.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistErrorKind {
    InvalidInput,
    GenerationFailed,
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("invalid playlist request: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("playlist generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),
}

impl PlaylistError {
    pub fn kind(&self) -> PlaylistErrorKind {
        match self {
            PlaylistError::InvalidInput(_) => PlaylistErrorKind::InvalidInput,
            PlaylistError::GenerationFailed(_) => PlaylistErrorKind::GenerationFailed,
        }
    }

    /// Text safe to show the end user; the backend cause is never included
    pub fn user_message(&self) -> &'static str {
        match self {
            PlaylistError::InvalidInput(e) => e.user_message(),
            PlaylistError::GenerationFailed(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}

#[derive(Clone)]
pub struct PlaylistService {
    catalog: Arc<Catalog>,
    client: GenerationClient,
}

impl PlaylistService {
    pub fn new(catalog: Arc<Catalog>, client: GenerationClient) -> Self {
        Self { catalog, client }
    }

    /// Generate a mood playlist. Tracks come back in the backend's order;
    /// titles not in the catalog are dropped and repeats are kept.
    pub async fn generate(
        &self,
        seed_song: &str,
        mood_prompt: &str,
    ) -> Result<Vec<Arc<Track>>, PlaylistError> {
        let request = PlaylistRequest::validate(seed_song, mood_prompt)?;
        self.generate_validated(&request).await
    }

    pub async fn generate_validated(
        &self,
        request: &PlaylistRequest,
    ) -> Result<Vec<Arc<Track>>, PlaylistError> {
        let instruction = compile_instruction(request, &self.catalog.titles());

        let result = self.client.generate(instruction).await.map_err(|e| {
            log::warn!("Error generating AI playlist: {}", e);
            PlaylistError::GenerationFailed(e)
        })?;

        let tracks = join_titles(&self.catalog, &result.playlist);
        log::info!(
            "AI playlist: {} titles returned, {} matched the catalog",
            result.playlist.len(),
            tracks.len()
        );
        Ok(tracks)
    }
}

/// Match titles to catalog tracks by exact string equality
fn join_titles(catalog: &Catalog, titles: &[String]) -> Vec<Arc<Track>> {
    titles
        .iter()
        .filter_map(|title| {
            let track = catalog.find_by_title(title);
            if track.is_none() {
                log::debug!("Dropping title not in catalog: {:?}", title);
            }
            track.cloned()
        })
        .collect()
}
