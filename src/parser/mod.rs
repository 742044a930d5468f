pub mod decode;
pub mod extract;

use decode::Discard;
use extract::Extractor;
use tracing::debug;

use crate::songs::Song;

/// A matched triple that did not become a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discarded {
    pub title: String,
    pub url: String,
    pub reason: Discard,
}

/// What one page contributed.
#[derive(Debug, Default)]
pub struct PageReport {
    pub songs: Vec<Song>,
    pub discards: Vec<Discarded>,
    pub undecodable: usize,
    pub not_audio: usize,
}

impl PageReport {
    pub fn found(&self) -> usize {
        self.songs.len()
    }

    pub fn discarded(&self) -> usize {
        self.undecodable + self.not_audio
    }

    /// Emit the page summary and every discard at debug level.
    pub fn log(&self, page: u32) {
        debug!(
            page,
            found = self.found(),
            discarded = self.discarded(),
            "page processed"
        );
        for d in &self.discards {
            debug!(page, title = %d.title, url = %d.url, reason = %d.reason, "discarded");
        }
    }
}

/// Two-step pipeline: page text → raw triples → decoded songs.
pub fn process_page(text: &str, extractor: &dyn Extractor, audio_marker: &str) -> PageReport {
    let mut report = PageReport::default();

    for raw in extractor.extract(text) {
        match decode::decode(&raw, audio_marker) {
            Ok(song) => report.songs.push(song),
            Err(reason) => {
                match reason {
                    Discard::Undecodable => report.undecodable += 1,
                    Discard::NotAudio => report.not_audio += 1,
                }
                report.discards.push(Discarded {
                    title: raw.title.to_string(),
                    url: raw.url.to_string(),
                    reason,
                });
            }
        }
    }

    report
}

// ── Tests ──
