//! Integration tests for the config file lifecycle.
//!
//! Bootstrap, upgrade and loading, as the CLI drives them.

use assert_fs::prelude::*;
use plex_dupefinder::core::config::{AppConfig, LoadOutcome};
use plex_dupefinder::core::media::MediaKind;
use plex_dupefinder::core::LibrarySection;
use predicates::prelude::*;

#[test]
fn bootstrap_then_load() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("plex-dupefinder/config.json");

    let first = AppConfig::load_or_bootstrap(config.path()).unwrap();
    assert!(matches!(first, LoadOutcome::Created { .. }));
    config.assert(predicate::str::contains("\"PLEX_LIBRARIES\""));
    config.assert(predicate::str::contains("\"*Remux*\": 20000"));

    let second = AppConfig::load_or_bootstrap(config.path()).unwrap();
    let LoadOutcome::Loaded(loaded) = second else {
        panic!("bootstrapped config should load cleanly");
    };
    assert_eq!(
        loaded.sections(),
        vec![
            LibrarySection::new("Movies", MediaKind::Movie),
            LibrarySection::new("TV", MediaKind::Episode),
        ]
    );
}

#[test]
fn old_config_is_upgraded_once() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("config.json");
    config
        .write_str(
            r#"{
                "PLEX_SERVER": "http://plex.local:32400",
                "PLEX_TOKEN": "abc",
                "PLEX_LIBRARIES": {"Films": 1},
                "SKIP_LIST": ["/keep/"]
            }"#,
        )
        .unwrap();

    let first = AppConfig::load_or_bootstrap(config.path()).unwrap();
    let LoadOutcome::Upgraded { added, .. } = first else {
        panic!("missing options should be added");
    };
    assert!(added.iter().any(|line| line.contains("FIND_DUPLICATE_FILEPATHS_ONLY")));
    assert!(added.iter().any(|line| line.contains("AUDIO_CODEC_SCORES")));
    config.assert(predicate::str::contains("\"SCORE_FILESIZE\": true"));

    let second = AppConfig::load_or_bootstrap(config.path()).unwrap();
    let LoadOutcome::Loaded(loaded) = second else {
        panic!("upgraded config should load cleanly");
    };
    assert_eq!(loaded.plex_server, "http://plex.local:32400");
    assert_eq!(loaded.skip_list, vec!["/keep/".to_string()]);
    assert_eq!(loaded.plex_libraries.len(), 1);
    assert!(loaded.validate().is_ok());
}

#[test]
fn prefilled_config_round_trips_through_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("config.json");

    let written = AppConfig::prefilled("https://plex.example.com", "token", true);
    written.save(config.path()).unwrap();

    assert_eq!(AppConfig::load(config.path()).unwrap(), written);
    config.assert(predicate::str::contains("\"AUTO_DELETE\": true"));
}
