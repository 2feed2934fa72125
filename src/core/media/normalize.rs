//! Attribute normalization: optional Plex attributes to a complete record.

use super::raw::RawMedia;
use super::{MediaInfo, UNKNOWN};
use tracing::debug;

/// Build a [`MediaInfo`] from a raw media element.
///
/// Never fails. Missing numbers become 0 and missing strings become
/// `"Unknown"`; each substitution is logged at debug level.
pub fn normalize(raw: &RawMedia, container_key: &str) -> MediaInfo {
    let id = number(raw.id, "id", 0);

    let mut files = Vec::with_capacity(raw.parts.len());
    let mut file_size_bytes = 0u64;
    for part in &raw.parts {
        match &part.file {
            Some(file) => files.push(file.clone()),
            None => debug!(media_id = id, part_id = ?part.id, "Media part has no file"),
        }
        file_size_bytes = file_size_bytes.saturating_add(part.size.unwrap_or(0));
    }

    MediaInfo {
        id,
        audio_codec: text(&raw.audio_codec, "audioCodec", id),
        video_codec: text(&raw.video_codec, "videoCodec", id),
        video_resolution: text(&raw.video_resolution, "videoResolution", id),
        width: number(raw.width, "width", id),
        height: number(raw.height, "height", id),
        duration_millis: number(raw.duration, "duration", id),
        bitrate_kbps: number(raw.bitrate, "bitrate", id),
        audio_channels: audio_channels(raw, id),
        multipart: files.len() > 1,
        files,
        file_size_bytes,
        container_key: container_key.to_string(),
        score: None,
    }
}

/// Sum of every audio stream's channels across all parts, falling back to
/// the media-level channel count when no stream reports any.
fn audio_channels(raw: &RawMedia, id: u64) -> u64 {
    let mut channels = 0u64;
    for part in &raw.parts {
        for stream in part.streams.iter().filter(|s| s.is_audio()) {
            if let Some(count) = stream.channels.filter(|c| *c > 0) {
                debug!(
                    media_id = id,
                    "Added {} channels for {} audio stream",
                    count,
                    stream.display_title.as_deref().unwrap_or(UNKNOWN)
                );
                channels += count;
            }
        }
    }

    if channels == 0 {
        channels = number(raw.audio_channels, "audioChannels", id);
    }
    channels
}

fn number(value: Option<u64>, field: &str, id: u64) -> u64 {
    match value {
        Some(v) if v > 0 => v,
        _ => {
            debug!(media_id = id, "Media item has no {}", field);
            0
        }
    }
}

fn text(value: &Option<String>, field: &str, id: u64) -> String {
    match value {
        Some(v) => v.clone(),
        None => {
            debug!(media_id = id, "Media item has no {}", field);
            UNKNOWN.to_string()
        }
    }
}
