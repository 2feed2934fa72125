//! # Media Module
//!
//! Canonical description of one duplicate candidate.
//!
//! Plex reports each copy of a title as a `Media` element with optional
//! attributes. [`normalize`] turns that into a [`MediaInfo`] where every
//! field has a value, so scoring and display never deal with absence.

mod normalize;
mod raw;

pub use normalize::normalize;
pub use raw::{RawMedia, RawPart, RawStream, AUDIO_STREAM_TYPE};

pub(crate) use raw::{lenient_string, lenient_u64, lenient_vec};

use serde::{Deserialize, Serialize};

/// Placeholder for string attributes the server did not report
pub const UNKNOWN: &str = "Unknown";

/// What a library section holds. Only affects how titles are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Episode,
}

impl MediaKind {
    /// Plex metadata type used when searching a section
    pub fn plex_type(&self) -> u8 {
        match self {
            MediaKind::Movie => 1,
            MediaKind::Episode => 4,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Episode => write!(f, "episode"),
        }
    }
}

/// One physical copy of a logical title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Plex media id, unique within a duplicate group
    pub id: u64,
    pub audio_codec: String,
    pub video_codec: String,
    /// Resolution tag such as "1080", "720", "4k" or "sd"
    pub video_resolution: String,
    pub width: u64,
    pub height: u64,
    pub duration_millis: u64,
    pub bitrate_kbps: u64,
    /// Channels summed across every audio stream of every part
    pub audio_channels: u64,
    /// Absolute paths of every part, in part order
    pub files: Vec<String>,
    /// More than one file (cd1/cd2 style releases)
    pub multipart: bool,
    /// Total size across all parts
    pub file_size_bytes: u64,
    /// Key of the owning library item, e.g. `/library/metadata/1234`
    pub container_key: String,
    /// `None` until scored, and always `None` in filepath-only mode
    pub score: Option<i64>,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            id: 0,
            audio_codec: UNKNOWN.to_string(),
            video_codec: UNKNOWN.to_string(),
            video_resolution: UNKNOWN.to_string(),
            width: 0,
            height: 0,
            duration_millis: 0,
            bitrate_kbps: 0,
            audio_channels: 0,
            files: Vec::new(),
            multipart: false,
            file_size_bytes: 0,
            container_key: String::new(),
            score: None,
        }
    }
}

/// Final path component. Splits on both separators because the Plex
/// server may run on Windows while this tool does not.
pub fn base_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_unknown_sentinel() {
        let info = MediaInfo::default();
        assert_eq!(info.audio_codec, "Unknown");
        assert_eq!(info.video_codec, "Unknown");
        assert_eq!(info.video_resolution, "Unknown");
        assert_eq!(info.bitrate_kbps, 0);
        assert!(info.score.is_none());
    }

    #[test]
    fn base_name_handles_both_separators() {
        assert_eq!(base_name("/movies/Heat (1995)/Heat.mkv"), "Heat.mkv");
        assert_eq!(base_name(r"D:\Movies\Heat\Heat.mkv"), "Heat.mkv");
        assert_eq!(base_name("Heat.mkv"), "Heat.mkv");
    }
}
