use thiserror::Error;

use super::extract::RawTriple;
use crate::songs::Song;

/// Why a matched triple did not become a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Discard {
    #[error("field is not a valid escaped string")]
    Undecodable,
    #[error("url does not point to audio")]
    NotAudio,
}

/// Decode all three fields and keep the triple only if its url names audio.
/// The returned song carries id 0.
pub fn decode(raw: &RawTriple<'_>, audio_marker: &str) -> Result<Song, Discard> {
    let title = unescape(raw.title)?;
    let artist = unescape(raw.artist)?;
    let audio = unescape(raw.url)?;

    if audio.is_empty() || !audio.contains(audio_marker) {
        return Err(Discard::NotAudio);
    }

    Ok(Song {
        id: 0,
        artist,
        title,
        audio,
    })
}

/// Parse `raw` as the body of a JSON string literal.
pub fn unescape(raw: &str) -> Result<String, Discard> {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).map_err(|_| Discard::Undecodable)
}
