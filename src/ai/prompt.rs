// Prompt construction for playlist generation
//
// The system prompt pins the model to JSON output; the instruction carries
// the user's request and the complete list of titles it may pick from.

use super::request::PlaylistRequest;

pub const SYSTEM_PROMPT: &str = r#"You are TuneDrop AI, a playlist curator built into a music discovery app.

You only ever recommend songs that exist in the app's catalog. Every title you
return must be copied exactly, character for character, from the list of
available songs you are given.

Respond with a single JSON object and nothing else, in this shape:

{
  "playlist": ["Song Title", "Another Song Title"]
}

An empty "playlist" array is a valid answer when nothing fits."#;

const TITLE_SEPARATOR: &str = ", ";

/// Render the instruction for one playlist request.
///
/// Titles are listed in the order given (catalog order), joined by `", "`.
/// The output depends only on the arguments.
pub fn compile_instruction(request: &PlaylistRequest, titles: &[&str]) -> String {
    let available = titles.join(TITLE_SEPARATOR);

    format!(
        "You are a playlist curator. Build a playlist that matches the mood below, \
starting from the given song or artist, by choosing songs from the available songs.

Starting Song: {seed}
Mood Prompt: {mood}
Available Songs: {available}

Only choose songs from the Available Songs list and use their titles exactly as written. \
Never include a song that is not in that list. You may choose any number of songs, \
including none.

Return the playlist as a list of song titles.
",
        seed = request.seed_song(),
        mood = request.mood_prompt(),
        available = available,
    )
}
