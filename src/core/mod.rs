//! # Core Module
//!
//! The UI-agnostic duplicate resolution engine.
//!
//! ## Modules
//! - `media` - Normalizes raw Plex media records
//! - `scoring` - Ranks copies of a title by quality
//! - `resolver` - Chooses the copy to keep
//! - `skiplist` - Protects configured paths from deletion
//! - `recorder` - Appends decisions to the audit log
//! - `library` - Talks to the Plex server
//! - `config` - Loads, bootstraps and upgrades the config file
//! - `reporter` - Human-readable candidate tables
//! - `pipeline` - Orchestrates the full workflow

pub mod config;
pub mod library;
pub mod media;
pub mod pipeline;
pub mod recorder;
pub mod reporter;
pub mod resolver;
pub mod scoring;
pub mod skiplist;

// Re-export commonly used types
pub use library::{LibraryClient, LibraryItem, LibrarySection};
pub use media::{MediaInfo, MediaKind};
pub use resolver::{Decision, DuplicateGroup, Policy, Removal};
