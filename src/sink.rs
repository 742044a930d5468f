use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::SinkError;
use crate::songs::Song;

/// Write `songs` as a pretty JSON array, replacing `path`.
pub fn write_songs(path: &Path, songs: &[Song]) -> Result<(), SinkError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(songs)?;
    fs::write(path, json).map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), songs = songs.len(), "wrote song list");
    Ok(())
}
