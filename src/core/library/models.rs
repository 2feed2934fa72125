//! Plex JSON response bodies.
//!
//! Every response is wrapped in a `MediaContainer`. Sections arrive as
//! `Directory` elements, library items as `Metadata` elements.

use crate::core::media::{lenient_string, lenient_u64, lenient_vec, MediaKind, RawMedia};
use serde::Deserialize;

/// Top-level wrapper of every Plex JSON response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaContainer {
    #[serde(rename = "MediaContainer", default)]
    pub inner: ContainerBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerBody {
    #[serde(rename = "Directory", default, deserialize_with = "lenient_vec")]
    pub directories: Vec<SectionDirectory>,
    #[serde(rename = "Metadata", default, deserialize_with = "lenient_vec")]
    pub metadata: Vec<LibraryItem>,
}

impl MediaContainer {
    pub fn into_directories(self) -> Vec<SectionDirectory> {
        self.inner.directories
    }

    pub fn into_metadata(self) -> Vec<LibraryItem> {
        self.inner.metadata
    }
}

/// A library section listed by `/library/sections`
#[derive(Debug, Clone, Deserialize)]
pub struct SectionDirectory {
    /// Numeric section key, as a string
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// `movie`, `show`, `artist` or `photo`
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub section_type: Option<String>,
}

/// A library item (movie or episode) and its copies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    /// e.g. `/library/metadata/1234`
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating_key: Option<String>,
    /// `movie` or `episode`
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Show title of an episode
    #[serde(default, deserialize_with = "lenient_string")]
    pub grandparent_title: Option<String>,
    /// Season number of an episode
    #[serde(default, deserialize_with = "lenient_u64")]
    pub parent_index: Option<u64>,
    /// Episode number within the season
    #[serde(default, deserialize_with = "lenient_u64")]
    pub index: Option<u64>,
    #[serde(rename = "Media", default, deserialize_with = "lenient_vec")]
    pub media: Vec<RawMedia>,
}

impl LibraryItem {
    pub fn movie(key: impl Into<String>, title: impl Into<String>, media: Vec<RawMedia>) -> Self {
        Self {
            key: Some(key.into()),
            item_type: Some(MediaKind::Movie.to_string()),
            title: Some(title.into()),
            media,
            ..Default::default()
        }
    }

    pub fn episode(
        key: impl Into<String>,
        show: impl Into<String>,
        season: u64,
        episode: u64,
        title: impl Into<String>,
        media: Vec<RawMedia>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            item_type: Some(MediaKind::Episode.to_string()),
            title: Some(title.into()),
            grandparent_title: Some(show.into()),
            parent_index: Some(season),
            index: Some(episode),
            media,
            ..Default::default()
        }
    }

    /// Key used to address the item's copies when deleting
    pub fn container_key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    /// Title as shown to the operator and written to the decision log:
    /// `Show - 01x04 - Episode` for episodes, the title for movies,
    /// `Unknown` for anything else.
    pub fn display_title(&self) -> String {
        let title = self.title.as_deref().unwrap_or_default();
        match self.item_type.as_deref() {
            Some("episode") => format!(
                "{} - {:02}x{:02} - {}",
                self.grandparent_title.as_deref().unwrap_or_default(),
                self.parent_index.unwrap_or(0),
                self.index.unwrap_or(0),
                title
            ),
            Some("movie") => title.to_string(),
            _ => crate::core::media::UNKNOWN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: &str = r#"{
        "MediaContainer": {
            "size": 3,
            "Directory": [
                {"key": "1", "title": "Movies", "type": "movie"},
                {"key": 2, "title": "TV", "type": "show"},
                {"title": "Broken"}
            ]
        }
    }"#;

    const DUPLICATES: &str = r#"{
        "MediaContainer": {
            "size": 1,
            "Metadata": [{
                "ratingKey": "1234",
                "key": "/library/metadata/1234",
                "type": "episode",
                "title": "Walkabout",
                "grandparentTitle": "Lost",
                "parentIndex": 1,
                "index": 4,
                "Media": [
                    {"id": 7, "duration": 2580000, "bitrate": 5000, "width": 1920,
                     "height": 1080, "audioChannels": 6, "audioCodec": "ac3",
                     "videoCodec": "h264", "videoResolution": "1080",
                     "Part": [{"id": 70, "file": "/tv/Lost/S01E04.mkv", "size": 1500000000}]},
                    {"id": 8, "videoResolution": "sd",
                     "Part": [{"id": 80, "file": "/tv/Lost/S01E04.avi", "size": "350000000"}]}
                ]
            }]
        }
    }"#;

    #[test]
    fn sections_parse_with_numeric_and_missing_keys() {
        let container: MediaContainer = serde_json::from_str(SECTIONS).unwrap();
        let dirs = container.into_directories();

        assert_eq!(dirs.len(), 3);
        assert_eq!(dirs[0].key.as_deref(), Some("1"));
        assert_eq!(dirs[1].key.as_deref(), Some("2"));
        assert_eq!(dirs[1].section_type.as_deref(), Some("show"));
        assert_eq!(dirs[2].key, None);
    }

    #[test]
    fn duplicate_listing_parses() {
        let container: MediaContainer = serde_json::from_str(DUPLICATES).unwrap();
        let items = container.into_metadata();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.rating_key.as_deref(), Some("1234"));
        assert_eq!(item.container_key(), "/library/metadata/1234");
        assert_eq!(item.media.len(), 2);
        assert_eq!(item.media[0].audio_codec.as_deref(), Some("ac3"));
        assert_eq!(item.media[1].parts[0].size, Some(350_000_000));
        assert_eq!(item.media[1].audio_codec, None);
    }

    #[test]
    fn empty_container_has_no_items() {
        let container: MediaContainer = serde_json::from_str(r#"{"MediaContainer": {"size": 0}}"#).unwrap();
        assert!(container.into_metadata().is_empty());
    }

    #[test]
    fn episode_title_is_padded() {
        let container: MediaContainer = serde_json::from_str(DUPLICATES).unwrap();
        let item = &container.into_metadata()[0];
        assert_eq!(item.display_title(), "Lost - 01x04 - Walkabout");
    }

    #[test]
    fn movie_and_unknown_titles() {
        let movie = LibraryItem::movie("/library/metadata/1", "Heat", vec![]);
        assert_eq!(movie.display_title(), "Heat");

        let clip = LibraryItem {
            item_type: Some("clip".to_string()),
            title: Some("Trailer".to_string()),
            ..Default::default()
        };
        assert_eq!(clip.display_title(), "Unknown");
    }

    #[test]
    fn episode_constructor_matches_server_shape() {
        let item = LibraryItem::episode("/library/metadata/9", "Lost", 2, 11, "The Hunting Party", vec![]);
        assert_eq!(item.display_title(), "Lost - 02x11 - The Hunting Party");
    }
}
