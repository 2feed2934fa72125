//! # plex-dupefinder CLI
//!
//! Command-line interface for the Plex duplicate finder.
//!
//! ## Usage
//! ```bash
//! plex-dupefinder init --server https://plex.local:32400 --token abc123
//! plex-dupefinder run
//! plex-dupefinder run --auto-delete --verbose
//! ```

mod cli;

use plex_dupefinder::Result;

fn main() -> Result<()> {
    cli::run()
}
