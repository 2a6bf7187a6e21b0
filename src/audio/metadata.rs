// src/audio/metadata.rs
//! Track metadata extraction using Lofty.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

/// What the player panel shows about the current track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Total track length as reported by the container.
    pub duration: Duration,
}

impl TrackMetadata {
    /// "Artist - Title", just the title, or `None` when the file is untagged.
    pub fn display_title(&self) -> Option<String> {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => Some(format!("{artist} - {title}")),
            (None, Some(title)) => Some(title.clone()),
            _ => None,
        }
    }
}

/// Load metadata for a file without touching player state.
/// This is safe to call from a background thread.
pub fn load_metadata(path: &Path) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .with_context(|| format!("failed to read tags from {}", path.display()))?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let title = tag.and_then(|t| t.title().map(|s| s.into_owned()));
    let artist = tag.and_then(|t| t.artist().map(|s| s.into_owned()));
    let duration = tagged_file.properties().duration();

    Ok(TrackMetadata {
        title,
        artist,
        duration,
    })
}
