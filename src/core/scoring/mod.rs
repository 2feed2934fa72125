//! # Scoring Module
//!
//! Reduces a [`MediaInfo`] to one integer so copies of a title can be
//! ranked. Higher is better.
//!
//! ## Formula
//! | Term              | Contribution                                   |
//! |-------------------|------------------------------------------------|
//! | audio codec       | weight from the audio codec table, else 0      |
//! | video codec       | weight from the video codec table, else 0      |
//! | video resolution  | weight from the resolution table, else 0       |
//! | filename globs    | every matching (glob, file) pair adds its weight |
//! | bitrate           | `kbps * 2`                                     |
//! | duration          | `millis / 300`                                 |
//! | width, height     | `pixels * 2` each                              |
//! | audio channels    | `channels * 1000`                              |
//! | file size         | `bytes / 100000` (only when enabled)           |
//!
//! Codec and resolution lookups are case-insensitive exact matches.
//! Filename globs are matched case-insensitively against the base name.

use crate::core::media::{base_name, MediaInfo};
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

pub const BITRATE_MULTIPLIER: i64 = 2;
pub const DURATION_DIVISOR: u64 = 300;
pub const WIDTH_MULTIPLIER: i64 = 2;
pub const HEIGHT_MULTIPLIER: i64 = 2;
pub const AUDIO_CHANNEL_MULTIPLIER: i64 = 1000;
pub const FILE_SIZE_DIVISOR: u64 = 100_000;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Ordered name -> weight lookup table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    entries: Vec<(String, i64)>,
}

impl WeightTable {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }

    /// First entry whose name equals `value` ignoring case
    pub fn lookup(&self, value: &str) -> Option<(&str, i64)> {
        let value = value.to_lowercase();
        self.entries
            .iter()
            .find(|(name, _)| name.to_lowercase() == value)
            .map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A compiled filename glob and its weight
#[derive(Debug, Clone)]
pub struct FilenameWeight {
    pattern: Pattern,
    weight: i64,
}

impl FilenameWeight {
    pub fn glob(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern
            .matches_with(&file_name.to_lowercase(), GLOB_OPTIONS)
    }
}

/// Operator-tunable weights. Read-only for the whole run.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    audio_codecs: WeightTable,
    video_codecs: WeightTable,
    resolutions: WeightTable,
    filenames: Vec<FilenameWeight>,
    score_file_size: bool,
}

impl ScoringConfig {
    /// Empty tables with file size scoring enabled
    pub fn new() -> Self {
        Self {
            audio_codecs: WeightTable::default(),
            video_codecs: WeightTable::default(),
            resolutions: WeightTable::default(),
            filenames: Vec::new(),
            score_file_size: true,
        }
    }

    pub fn with_audio_codecs(mut self, table: WeightTable) -> Self {
        self.audio_codecs = table;
        self
    }

    pub fn with_video_codecs(mut self, table: WeightTable) -> Self {
        self.video_codecs = table;
        self
    }

    pub fn with_resolutions(mut self, table: WeightTable) -> Self {
        self.resolutions = table;
        self
    }

    /// Compile filename globs. Invalid globs are logged and left out.
    pub fn with_filename_globs<I, K>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        self.filenames = globs
            .into_iter()
            .filter_map(|(glob, weight)| {
                let glob = glob.as_ref();
                match Pattern::new(&glob.to_lowercase()) {
                    Ok(pattern) => Some(FilenameWeight { pattern, weight }),
                    Err(e) => {
                        warn!("Ignoring invalid filename pattern '{}': {}", glob, e);
                        None
                    }
                }
            })
            .collect();
        self
    }

    pub fn with_file_size(mut self, enabled: bool) -> Self {
        self.score_file_size = enabled;
        self
    }

    pub fn filename_weights(&self) -> &[FilenameWeight] {
        &self.filenames
    }

    pub fn scores_file_size(&self) -> bool {
        self.score_file_size
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Score one candidate. Pure and deterministic.
pub fn score(media: &MediaInfo, config: &ScoringConfig) -> i64 {
    let mut total: i64 = 0;

    let lookups = [
        ("audio_codec", &config.audio_codecs, &media.audio_codec),
        ("video_codec", &config.video_codecs, &media.video_codec),
        ("video_resolution", &config.resolutions, &media.video_resolution),
    ];
    for (term, table, value) in lookups {
        if let Some((name, weight)) = table.lookup(value) {
            debug!(media_id = media.id, "Added {} to score for {} being {:?}", weight, term, name);
            total = total.saturating_add(weight);
        }
    }

    for filename in &config.filenames {
        for file in &media.files {
            if filename.matches(base_name(file)) {
                debug!(
                    media_id = media.id,
                    "Added {} to score for filename pattern {}",
                    filename.weight,
                    filename.glob()
                );
                total = total.saturating_add(filename.weight);
            }
        }
    }

    let terms = [
        ("video bitrate", scaled(media.bitrate_kbps, BITRATE_MULTIPLIER)),
        ("video duration", to_i64(media.duration_millis / DURATION_DIVISOR)),
        ("video width", scaled(media.width, WIDTH_MULTIPLIER)),
        ("video height", scaled(media.height, HEIGHT_MULTIPLIER)),
        ("audio channels", scaled(media.audio_channels, AUDIO_CHANNEL_MULTIPLIER)),
    ];
    for (term, value) in terms {
        debug!(media_id = media.id, "Added {} to score for {}", value, term);
        total = total.saturating_add(value);
    }

    if config.score_file_size {
        let value = to_i64(media.file_size_bytes / FILE_SIZE_DIVISOR);
        debug!(media_id = media.id, "Added {} to score for total file size", value);
        total = total.saturating_add(value);
    }

    total
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn scaled(value: u64, multiplier: i64) -> i64 {
    to_i64(value).saturating_mul(multiplier)
}
