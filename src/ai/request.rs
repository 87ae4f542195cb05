// Playlist request validation
//
// Runs before anything is sent to the generation backend. Values are
// length-checked only; they are passed on exactly as typed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_SEED_SONG_CHARS: usize = 2;
pub const MIN_MOOD_PROMPT_CHARS: usize = 5;

/// Raw form input as submitted by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistForm {
    #[serde(default, alias = "songInput")]
    pub seed_song: String,
    #[serde(default)]
    pub mood_prompt: String,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    seed_song: String,
    mood_prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistField {
    SeedSong,
    MoodPrompt,
}

impl PlaylistField {
    /// Message shown next to the offending form field
    pub fn message(self) -> &'static str {
        match self {
            PlaylistField::SeedSong => "Please enter a song or artist.",
            PlaylistField::MoodPrompt => "Please describe the mood.",
        }
    }
}

impl fmt::Display for PlaylistField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistField::SeedSong => write!(f, "seedSong"),
            PlaylistField::MoodPrompt => write!(f, "moodPrompt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be at least {min_chars} characters (got {actual_chars})")]
pub struct ValidationError {
    pub field: PlaylistField,
    pub min_chars: usize,
    pub actual_chars: usize,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        self.field.message()
    }
}

impl PlaylistRequest {
    /// Check both inputs against their minimum lengths. The seed song is
    /// checked first, so it is the one reported when both are too short.
    pub fn validate(
        seed_song: impl Into<String>,
        mood_prompt: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let seed_song = seed_song.into();
        let mood_prompt = mood_prompt.into();

        check_length(PlaylistField::SeedSong, &seed_song, MIN_SEED_SONG_CHARS)?;
        check_length(PlaylistField::MoodPrompt, &mood_prompt, MIN_MOOD_PROMPT_CHARS)?;

        Ok(Self {
            seed_song,
            mood_prompt,
        })
    }

    pub fn seed_song(&self) -> &str {
        &self.seed_song
    }

    pub fn mood_prompt(&self) -> &str {
        &self.mood_prompt
    }
}

impl TryFrom<PlaylistForm> for PlaylistRequest {
    type Error = ValidationError;

    fn try_from(form: PlaylistForm) -> Result<Self, Self::Error> {
        Self::validate(form.seed_song, form.mood_prompt)
    }
}

fn check_length(
    field: PlaylistField,
    value: &str,
    min_chars: usize,
) -> Result<(), ValidationError> {
    // Unicode scalar values, not UTF-16 units: a lone emoji is one char
    let actual_chars = value.chars().count();
    if actual_chars < min_chars {
        return Err(ValidationError {
            field,
            min_chars,
            actual_chars,
        });
    }
    Ok(())
}
