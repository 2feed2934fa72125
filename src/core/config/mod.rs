//! # Config Module
//!
//! The JSON configuration file.
//!
//! Keys are upper snake case (`PLEX_SERVER`, `SKIP_LIST`, ...). A missing
//! file is replaced by a prefilled starter config; a file missing newer
//! options is upgraded in place. Either way the caller should stop and let
//! the operator review the file before anything is deleted.

mod defaults;

pub use defaults::{
    default_audio_codec_scores, default_filename_scores, default_libraries,
    default_resolution_scores, default_video_codec_scores,
};

use crate::core::library::LibrarySection;
use crate::core::media::MediaKind;
use crate::core::scoring::{ScoringConfig, WeightTable};
use crate::core::skiplist::SkipList;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// `PLEX_LIBRARIES` value of a TV section; anything else is a movie section
pub const TV_SECTION: i64 = 2;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AppConfig {
    pub plex_server: String,
    pub plex_token: String,
    /// Section name -> `1` (movies) or `2` (TV)
    pub plex_libraries: BTreeMap<String, i64>,
    pub audio_codec_scores: BTreeMap<String, i64>,
    pub video_codec_scores: BTreeMap<String, i64>,
    pub video_resolution_scores: BTreeMap<String, i64>,
    /// Glob over the file name -> weight; every match is added
    pub filename_scores: BTreeMap<String, i64>,
    /// Path fragments that protect files from deletion
    pub skip_list: Vec<String>,
    pub score_filesize: bool,
    pub auto_delete: bool,
    pub find_duplicate_filepaths_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plex_server: "https://plex.your-server.com".to_string(),
            plex_token: String::new(),
            plex_libraries: BTreeMap::new(),
            audio_codec_scores: default_audio_codec_scores(),
            video_codec_scores: default_video_codec_scores(),
            video_resolution_scores: default_resolution_scores(),
            filename_scores: BTreeMap::new(),
            skip_list: Vec::new(),
            score_filesize: true,
            auto_delete: false,
            find_duplicate_filepaths_only: false,
        }
    }
}

/// How [`AppConfig::load_or_bootstrap`] found the file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file existed and was complete
    Loaded(AppConfig),
    /// No file existed; a starter config was written
    Created { path: PathBuf },
    /// Options were missing and have been added; one line per addition
    Upgraded { path: PathBuf, added: Vec<String> },
}

impl AppConfig {
    /// Starter config with example sections and filename weights
    pub fn prefilled(server: &str, token: &str, auto_delete: bool) -> Self {
        Self {
            plex_server: server.to_string(),
            plex_token: token.to_string(),
            plex_libraries: default_libraries(),
            filename_scores: default_filename_scores(),
            auto_delete,
            ..Self::default()
        }
    }

    /// `<config dir>/plex-dupefinder/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plex-dupefinder")
            .join("config.json")
    }

    /// Read and parse a config file without upgrading it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let value = read_value(path)?;
        serde_json::from_value(value).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `path`, writing a starter config when it does not exist and
    /// adding any options it lacks.
    pub fn load_or_bootstrap(path: &Path) -> Result<LoadOutcome, ConfigError> {
        if !path.exists() {
            Self::prefilled("https://plex.your-server.com", "", false).save(path)?;
            info!("Wrote default config to {}", path.display());
            return Ok(LoadOutcome::Created {
                path: path.to_path_buf(),
            });
        }

        let mut current = read_value(path)?;
        let defaults = serde_json::to_value(Self::default()).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let added = upgrade(&defaults, &mut current, None);
        let config: Self = serde_json::from_value(current.clone()).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if added.is_empty() {
            debug!("Loaded config from {}", path.display());
            return Ok(LoadOutcome::Loaded(config));
        }

        write_value(path, &current)?;
        info!(added = added.len(), "Upgraded config {}", path.display());
        Ok(LoadOutcome::Upgraded {
            path: path.to_path_buf(),
            added,
        })
    }

    /// Write the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let value = serde_json::to_value(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        write_value(path, &value)
    }

    /// Fail unless `PLEX_SERVER` is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidServerUrl {
            url: self.plex_server.clone(),
            reason,
        };
        let url = Url::parse(&self.plex_server).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme {:?}", other))),
        }
    }

    /// Sections to scan, in name order
    pub fn sections(&self) -> Vec<LibrarySection> {
        self.plex_libraries
            .iter()
            .map(|(name, kind)| {
                let kind = if *kind == TV_SECTION {
                    MediaKind::Episode
                } else {
                    MediaKind::Movie
                };
                LibrarySection::new(name.clone(), kind)
            })
            .collect()
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig::new()
            .with_audio_codecs(WeightTable::new(self.audio_codec_scores.clone()))
            .with_video_codecs(WeightTable::new(self.video_codec_scores.clone()))
            .with_resolutions(WeightTable::new(self.video_resolution_scores.clone()))
            .with_filename_globs(self.filename_scores.iter().map(|(glob, w)| (glob, *w)))
            .with_file_size(self.score_filesize)
    }

    pub fn skip_list(&self) -> SkipList {
        SkipList::new(&self.skip_list)
    }
}

fn read_value(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_value(path: &Path, value: &Value) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    text.push('\n');
    fs::write(path, text).map_err(write_error)
}

/// Merge options from `default` that `current` lacks.
///
/// Objects are merged key by key, recursively. Lists gain the default
/// elements they do not contain. Values present in `current` are never
/// changed. Returns a description of every addition.
fn upgrade(default: &Value, current: &mut Value, key: Option<&str>) -> Vec<String> {
    let mut added = Vec::new();
    match (default, current) {
        (Value::Object(default), Value::Object(current)) => {
            merge_object(default, current, key, &mut added);
        }
        (Value::Array(default), Value::Array(current)) => {
            for item in default {
                if !current.contains(item) {
                    current.push(item.clone());
                    added.push(format!("Added to config option {:?}: {}", key.unwrap_or_default(), item));
                }
            }
        }
        _ => {}
    }
    added
}

fn merge_object(
    default: &Map<String, Value>,
    current: &mut Map<String, Value>,
    parent: Option<&str>,
    added: &mut Vec<String>,
) {
    for (k, v) in default {
        match current.get_mut(k) {
            Some(existing) => added.extend(upgrade(v, existing, Some(k.as_str()))),
            None => {
                current.insert(k.clone(), v.clone());
                added.push(match parent {
                    None => format!("Added {:?} config option: {}", k, v),
                    Some(parent) => format!("Added {:?} to config option {:?}: {}", k, parent, v),
                });
            }
        }
    }
}
