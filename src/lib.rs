//! # Plex Dupefinder
//!
//! Finds media items a Plex server holds more than once, decides which copy
//! to keep and removes the rest.
//!
//! ## Core Philosophy
//! - **The skip list always wins** - a protected file is never deleted,
//!   whatever its score
//! - **Ask by default** - automatic deletion has to be switched on
//! - **Leave a trail** - every decision is appended to a log
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Normalization, scoring, resolution and the library client
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PlexDupesError, Result};

use std::io;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// File name of the persistent debug log, kept next to the config file
pub const ACTIVITY_LOG: &str = "activity.log";

const ACTIVITY_FILTER: &str = "info,plex_dupefinder=debug";

/// Initialize tracing for the library
///
/// Console logs go to stderr. `RUST_LOG` takes precedence; otherwise only
/// warnings are shown, or debug output for this crate when `verbose` is set.
///
/// With a `log_dir`, every score term, candidate and deletion is also
/// appended to [`ACTIVITY_LOG`] in that directory at debug level. Keep the
/// returned guard alive until the program exits so the file gets flushed.
pub fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default = if verbose {
        "warn,plex_dupefinder=debug"
    } else {
        "warn"
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    let (activity, guard) = match log_dir.map(activity_writer) {
        Some(Ok((writer, guard))) => (Some(activity_layer(writer)), Some(guard)),
        Some(Err(e)) => {
            eprintln!("Activity log disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console)
        .with(activity)
        .try_init();

    guard
}

fn activity_writer(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(ACTIVITY_LOG)
        .build(dir)
        .map_err(io::Error::other)?;
    Ok(tracing_appender::non_blocking(appender))
}

fn activity_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new(ACTIVITY_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::{LibraryItem, MemoryLibrary};
    use crate::core::media::{MediaKind, RawMedia};
    use crate::core::pipeline::Pipeline;
    use crate::core::resolver::{NoPrompt, Policy};
    use crate::core::LibrarySection;
    use crate::events::null_sender;
    use std::time::Duration;

    fn copy(id: u64, channels: u64) -> RawMedia {
        RawMedia {
            id: Some(id),
            audio_channels: Some(channels),
            ..Default::default()
        }
    }

    #[test]
    fn run_leaves_score_terms_in_activity_log() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = activity_writer(dir.path()).unwrap();
        let subscriber = tracing_subscriber::registry().with(activity_layer(writer));

        let library = MemoryLibrary::new();
        library.insert(
            "Movies",
            LibraryItem::movie("/library/metadata/1", "Heat", vec![copy(11, 2), copy(12, 6)]),
        );
        tracing::subscriber::with_default(subscriber, || {
            Pipeline::builder(Box::new(library.clone()))
                .sections(vec![LibrarySection::new("Movies", MediaKind::Movie)])
                .policy(Policy::Automatic)
                .deletion_pause(Duration::ZERO)
                .build()
                .run(&mut NoPrompt, &null_sender());
            tracing::trace!("below the activity level");
        });
        drop(guard);

        let log = std::fs::read_to_string(dir.path().join(ACTIVITY_LOG)).unwrap();
        assert!(log.contains("DEBUG"));
        assert!(log.contains("Added 6000 to score for audio channels"));
        assert!(log.contains("Added 2000 to score for audio channels"));
        assert!(log.contains("Processing: \"Heat\""));
        assert!(!log.contains("below the activity level"));
        assert_eq!(library.deleted(), vec![("/library/metadata/1".to_string(), 11)]);
    }

    #[test]
    fn activity_log_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("config").join("plex-dupefinder");
        let (_writer, guard) = activity_writer(&nested).unwrap();
        drop(guard);
        assert!(nested.join(ACTIVITY_LOG).exists());
    }
}
