//! Raw media records as the Plex server reports them.
//!
//! Every attribute is optional. The deserializers here never fail on a
//! single attribute: a value of the wrong shape is treated the same as a
//! value that is absent, and normalization fills in the default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Plex `streamType` of an audio stream
pub const AUDIO_STREAM_TYPE: u64 = 2;

/// One physical copy of a title (a Plex `Media` element)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMedia {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    /// Overall bitrate in Kbps
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bitrate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    /// Channel count of the primary audio stream
    #[serde(default, deserialize_with = "lenient_u64")]
    pub audio_channels: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio_codec: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_codec: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_resolution: Option<String>,
    #[serde(rename = "Part", default, deserialize_with = "lenient_vec")]
    pub parts: Vec<RawPart>,
}

/// One file of a media item. Multi-part titles (cd1/cd2) have several.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPart {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    /// Only present when the item was fetched with full metadata
    #[serde(rename = "Stream", default, deserialize_with = "lenient_vec")]
    pub streams: Vec<RawStream>,
}

/// A video, audio or subtitle stream inside a part
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStream {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub stream_type: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub channels: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_title: Option<String>,
}

impl RawStream {
    pub fn is_audio(&self) -> bool {
        self.stream_type == Some(AUDIO_STREAM_TYPE)
    }
}

/// Accepts numbers, numeric strings and floats; anything else is `None`.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Accepts strings and numbers (Plex sends `videoResolution` as either).
/// Empty strings count as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Keeps every element that parses and drops the rest.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
