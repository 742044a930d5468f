use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One chart entry as persisted. Field order is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub artist: String,
    pub title: String,
    pub audio: String,
}

/// Collects songs across pages in production order.
///
/// Ids stay at 0 until [`Accumulator::into_songs`] collapses duplicates.
#[derive(Debug, Default)]
pub struct Accumulator {
    songs: Vec<Song>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, songs: impl IntoIterator<Item = Song>) {
        self.songs.extend(songs);
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Deduplicate by `audio` and assign ids 1..=N.
    ///
    /// A later song replaces an earlier one with the same `audio`, but keeps
    /// the slot where that `audio` was first seen.
    pub fn into_songs(self) -> Vec<Song> {
        dedup_by_audio(self.songs)
    }
}

pub fn dedup_by_audio(songs: Vec<Song>) -> Vec<Song> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(songs.len());
    let mut unique: Vec<Song> = Vec::with_capacity(songs.len());

    for song in songs {
        match slots.get(&song.audio) {
            Some(&i) => unique[i] = song,
            None => {
                slots.insert(song.audio.clone(), unique.len());
                unique.push(song);
            }
        }
    }

    for (i, song) in unique.iter_mut().enumerate() {
        song.id = i as u32 + 1;
    }
    unique
}
