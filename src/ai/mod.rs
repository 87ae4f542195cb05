// AI module for mood-based playlist generation
//
// This module provides:
// - Request validation for the playlist form
// - Prompt compilation against the catalog's title list
// - A generation client that shape-checks backend output
// - The Claude API backend and API key resolution

pub mod claude_client;
pub mod credentials;
pub mod generation;
pub mod prompt;
pub mod request;

// Re-export commonly used types
pub use claude_client::ClaudeBackend;
pub use credentials::CredentialManager;
pub use generation::{
    GenerationBackend, GenerationClient, GenerationError, GenerationRequest, PlaylistResult,
};
pub use prompt::{compile_instruction, SYSTEM_PROMPT};
pub use request::{PlaylistForm, PlaylistRequest, ValidationError};
