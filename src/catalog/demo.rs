// Built-in demo catalog
//
// Artwork points at seeded placeholder images; previews are royalty-free
// clips hosted on the Pixabay CDN.

use super::Track;

const FALLBACK_ARTWORK_URL: &str = "https://picsum.photos/seed/fallback/200/200";
const FALLBACK_ARTWORK_HINT: &str = "image";

/// (artwork id, hint) pairs for the placeholder artwork set
const ARTWORK: &[(&str, &str)] = &[
    ("album-art-1", "retro synth"),
    ("album-art-2", "neon sunset"),
    ("album-art-3", "minimal abstract"),
    ("album-art-4", "colorful pattern"),
    ("album-art-5", "misty forest"),
    ("album-art-6", "cassette tape"),
    ("album-art-7", "city night"),
    ("album-art-8", "cartoon doodle"),
    ("album-art-9", "vinyl record"),
    ("album-art-10", "space nebula"),
    ("album-art-11", "piano keys"),
    ("album-art-12", "urban street"),
];

struct DemoTrack {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    art_id: &'static str,
    preview_url: &'static str,
}

const TRACKS: &[DemoTrack] = &[
    DemoTrack {
        id: "1",
        title: "Future Funk",
        artist: "Cosmic Groove",
        album: "Galaxy Beats",
        art_id: "album-art-1",
        preview_url: "https://cdn.pixabay.com/audio/2022/01/24/audio_b79c32a59d.mp3",
    },
    DemoTrack {
        id: "2",
        title: "Retro Wave",
        artist: "Neon Dreams",
        album: "Sunset Drive",
        art_id: "album-art-2",
        preview_url: "https://cdn.pixabay.com/audio/2023/05/20/audio_5514f84c47.mp3",
    },
    DemoTrack {
        id: "3",
        title: "Minimal Echoes",
        artist: "Mono-Pulse",
        album: "Soundscapes",
        art_id: "album-art-3",
        preview_url: "https://cdn.pixabay.com/audio/2022/02/07/audio_f523d463ac.mp3",
    },
    DemoTrack {
        id: "4",
        title: "Color Trip",
        artist: "Kaleidoscope",
        album: "Vivid",
        art_id: "album-art-4",
        preview_url: "https://cdn.pixabay.com/audio/2023/04/05/audio_2dc99a2a7a.mp3",
    },
    DemoTrack {
        id: "5",
        title: "Morning Mist",
        artist: "Serenity",
        album: "Quiet Places",
        art_id: "album-art-5",
        preview_url: "https://cdn.pixabay.com/audio/2024/05/10/audio_f31c26127e.mp3",
    },
    DemoTrack {
        id: "6",
        title: "Lo-Fi Sunday",
        artist: "Chill Cat",
        album: "Tape Deck",
        art_id: "album-art-6",
        preview_url: "https://cdn.pixabay.com/audio/2022/05/27/audio_18088ee67a.mp3",
    },
    DemoTrack {
        id: "7",
        title: "Cyber City",
        artist: "Grid Runner",
        album: "Metropolis",
        art_id: "album-art-7",
        preview_url: "https://cdn.pixabay.com/audio/2023/11/17/audio_b29c9b986f.mp3",
    },
    DemoTrack {
        id: "8",
        title: "Cartoon Chase",
        artist: "The Doodles",
        album: "Sketches",
        art_id: "album-art-8",
        preview_url: "https://cdn.pixabay.com/audio/2023/09/24/audio_a7e2ed371c.mp3",
    },
    DemoTrack {
        id: "9",
        title: "Jazz Club",
        artist: "Night Owls",
        album: "Spinning Vinyl",
        art_id: "album-art-9",
        preview_url: "https://cdn.pixabay.com/audio/2024/05/10/audio_f31c26127e.mp3",
    },
    DemoTrack {
        id: "10",
        title: "Cosmic Drift",
        artist: "Stargazer",
        album: "Nebula",
        art_id: "album-art-10",
        preview_url: "https://cdn.pixabay.com/audio/2023/05/20/audio_5514f84c47.mp3",
    },
    DemoTrack {
        id: "11",
        title: "Ivory Keys",
        artist: "Piano Man",
        album: "Sonatas",
        art_id: "album-art-11",
        preview_url: "https://cdn.pixabay.com/audio/2022/01/24/audio_b79c32a59d.mp3",
    },
    DemoTrack {
        id: "12",
        title: "Street Beat",
        artist: "Urban Flow",
        album: "Concrete Jungle",
        art_id: "album-art-12",
        preview_url: "https://cdn.pixabay.com/audio/2022/02/07/audio_f523d463ac.mp3",
    },
];

/// Resolve an artwork id to (url, hint), falling back to a generic image
fn artwork(id: &str) -> (String, String) {
    match ARTWORK.iter().find(|(art_id, _)| *art_id == id) {
        Some((art_id, hint)) => (
            format!("https://picsum.photos/seed/{}/200/200", art_id),
            hint.to_string(),
        ),
        None => (
            FALLBACK_ARTWORK_URL.to_string(),
            FALLBACK_ARTWORK_HINT.to_string(),
        ),
    }
}

pub fn tracks() -> Vec<Track> {
    TRACKS
        .iter()
        .map(|demo| {
            let (artwork_url, artwork_hint) = artwork(demo.art_id);
            Track {
                id: demo.id.to_string(),
                title: demo.title.to_string(),
                artist: demo.artist.to_string(),
                album: demo.album.to_string(),
                artwork_url,
                artwork_hint,
                preview_url: demo.preview_url.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_demo_track_has_artwork() {
        for track in tracks() {
            assert_ne!(track.artwork_url, FALLBACK_ARTWORK_URL, "track {}", track.id);
        }
    }

    #[test]
    fn test_unknown_artwork_falls_back() {
        let (url, hint) = artwork("album-art-99");
        assert_eq!(url, FALLBACK_ARTWORK_URL);
        assert_eq!(hint, "image");
    }
}
