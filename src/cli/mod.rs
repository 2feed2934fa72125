//! # CLI Module
//!
//! Command-line interface for the Plex duplicate finder.
//!
//! ## Usage
//! ```bash
//! # Write a starter config
//! plex-dupefinder init --server https://plex.local:32400 --token abc123
//!
//! # Find duplicates and choose a keeper for each
//! plex-dupefinder run
//!
//! # Keep the best copy without asking
//! plex-dupefinder run --auto-delete
//!
//! # Only remove entries that point at the same file
//! plex-dupefinder run --filepaths-only
//! ```

use clap::{Parser, Subcommand};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use plex_dupefinder::core::config::{AppConfig, LoadOutcome};
use plex_dupefinder::core::library::PlexClient;
use plex_dupefinder::core::media::MediaInfo;
use plex_dupefinder::core::pipeline::{Pipeline, PipelineResult};
use plex_dupefinder::core::recorder::DecisionRecorder;
use plex_dupefinder::core::reporter::{format_bytes, CandidateTable};
use plex_dupefinder::core::resolver::{KeeperPrompt, Policy};
use plex_dupefinder::error::{ConfigError, Result};
use plex_dupefinder::events::{
    DeleteEvent, Event, EventChannel, PipelineEvent, PipelinePhase, ResolveEvent, RunSummary,
    ScanEvent,
};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const DECISIONS_FILE: &str = "decisions.log";

/// Plex Dupefinder - Find and remove duplicate media in Plex
#[derive(Parser, Debug)]
#[command(name = "plex-dupefinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find duplicates, choose keepers and delete the other copies
    Run {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Decision log path (defaults to decisions.log next to the config)
        #[arg(long)]
        decisions: Option<PathBuf>,

        /// Keep the best copy without asking
        #[arg(long)]
        auto_delete: bool,

        /// Only act on duplicates that share one file path
        #[arg(long)]
        filepaths_only: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a starter config file
    Init {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Plex server URL, e.g. https://plex.local:32400
        #[arg(long)]
        server: String,

        /// Plex authentication token (X-Plex-Token). In Plex Web, open an
        /// item's "Get Info" > "View XML" and copy the X-Plex-Token value
        /// from the address bar.
        #[arg(long)]
        token: String,

        /// Keep the best copy without asking
        #[arg(long)]
        auto_delete: bool,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            decisions,
            auto_delete,
            filepaths_only,
            verbose,
        } => {
            let path = config.unwrap_or_else(AppConfig::default_path);
            // flushes the activity log on exit
            let _guard = plex_dupefinder::init_tracing(verbose, path.parent());
            run_dupefinder(path, decisions, auto_delete, filepaths_only, verbose)
        }
        Commands::Init {
            config,
            server,
            token,
            auto_delete,
            force,
        } => {
            plex_dupefinder::init_tracing(false, None);
            run_init(config, &server, &token, auto_delete, force)
        }
    }
}

fn run_init(
    config_path: Option<PathBuf>,
    server: &str,
    token: &str,
    auto_delete: bool,
    force: bool,
) -> Result<()> {
    let term = Term::stderr();
    let path = config_path.unwrap_or_else(AppConfig::default_path);

    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path }.into());
    }

    let config = AppConfig::prefilled(server, token, auto_delete);
    config.validate()?;
    config.save(&path)?;

    term.write_line(&format!(
        "{} Wrote config to {}",
        style("✓").green().bold(),
        path.display()
    ))
    .ok();
    term.write_line(&format!(
        "  {}",
        style("Review PLEX_LIBRARIES and SKIP_LIST before the first run.").dim()
    ))
    .ok();
    Ok(())
}

fn run_dupefinder(
    path: PathBuf,
    decisions: Option<PathBuf>,
    auto_delete: bool,
    filepaths_only: bool,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    term.write_line(&format!(
        "{} {}",
        style("Plex Dupefinder").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();

    let mut config = match AppConfig::load_or_bootstrap(&path)? {
        LoadOutcome::Loaded(config) => config,
        LoadOutcome::Created { path } => {
            term.write_line(&format!("Dumping default config to: {}", path.display()))
                .ok();
            term.write_line("Please edit the default configuration before running again!")
                .ok();
            return Ok(());
        }
        LoadOutcome::Upgraded { added, .. } => {
            for line in added {
                term.write_line(&line).ok();
            }
            term.write_line("New config options were added, adjust and restart!")
                .ok();
            return Ok(());
        }
    };

    // flags can switch modes on, never off
    config.auto_delete |= auto_delete;
    config.find_duplicate_filepaths_only |= filepaths_only;
    config.validate()?;

    let library = PlexClient::connect(&config.plex_server, &config.plex_token)?;
    term.write_line("Initialized").ok();

    let decisions = decisions.unwrap_or_else(|| decisions_path(&path));
    let policy = if config.auto_delete {
        Policy::Automatic
    } else {
        Policy::Manual
    };

    let pipeline = Pipeline::builder(Box::new(library))
        .sections(config.sections())
        .scoring(config.scoring_config())
        .skip_list(config.skip_list())
        .policy(policy)
        .filepaths_only(config.find_duplicate_filepaths_only)
        .recorder(DecisionRecorder::new(decisions.clone()))
        .build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }

    let announce_groups = policy == Policy::Automatic;

    // Handle events in a separate thread; it is the only writer to stdout
    let event_thread = thread::spawn(move || {
        let out = Term::stdout();
        for event in receiver.iter() {
            render_event(&out, &spinner, announce_groups, event);
        }
    });

    let mut prompt = ConsolePrompt;
    let result = pipeline.run(&mut prompt, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    print_problems(&term, &result, verbose);
    term.write_line(&format!(
        "  {}",
        style(format!("Decisions were appended to {}", decisions.display())).dim()
    ))
    .ok();
    Ok(())
}

fn decisions_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join(DECISIONS_FILE))
        .unwrap_or_else(|| PathBuf::from(DECISIONS_FILE))
}

/// Reads the operator's answer from stdin. The question itself is printed
/// by the event thread when it renders `AwaitingSelection`.
struct ConsolePrompt;

impl KeeperPrompt for ConsolePrompt {
    fn ask(&mut self, _title: &str, _ranked: &[&MediaInfo]) -> io::Result<String> {
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(input)
    }
}

fn render_event(out: &Term, spinner: &ProgressBar, announce_groups: bool, event: Event) {
    match event {
        Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: phase @ PipelinePhase::Scanning,
        }) => {
            spinner.set_message(format!("{}...", phase));
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
        Event::Scan(ScanEvent::SectionScanned {
            section,
            duplicates,
        }) => {
            spinner.println(format!(
                "Found {} dupes for section {:?}",
                style(duplicates).cyan(),
                section
            ));
        }
        Event::Scan(ScanEvent::SectionFailed { section, message }) => {
            spinner.println(format!(
                "{} Could not search section {:?}: {}",
                style("✗").red().bold(),
                section,
                message
            ));
        }
        Event::Scan(ScanEvent::Completed { .. }) => spinner.finish_and_clear(),
        Event::Resolve(ResolveEvent::GroupStarted { title, .. }) if announce_groups => {
            out.write_line(&format!(
                "\nDetermining best media item to keep for {:?} ...",
                title
            ))
            .ok();
        }
        Event::Resolve(ResolveEvent::AwaitingSelection {
            title,
            candidates,
            scored,
        }) => {
            out.write_line(&format!(
                "\nWhich media item do you wish to keep for {:?} ?\n",
                title
            ))
            .ok();
            let table = CandidateTable::new(&candidates, scored);
            for (i, line) in table.lines().iter().enumerate() {
                if i == 0 {
                    out.write_line(&style(line).bold().to_string()).ok();
                } else {
                    out.write_line(line).ok();
                }
            }
            out.write_str("\nChoose item to keep (0 = skip | b = best): ").ok();
            out.flush().ok();
        }
        Event::Resolve(ResolveEvent::Kept { media, .. }) => {
            out.write_line(&format!(
                "\tKeeping  : {} - {}",
                style(media.id).green(),
                media.files.join(", ")
            ))
            .ok();
        }
        Event::Resolve(ResolveEvent::Skipped { title, reason }) => {
            out.write_line(&format!(
                "{} {:?}: {}",
                style("Not removing anything for").yellow(),
                title,
                reason
            ))
            .ok();
        }
        Event::Delete(DeleteEvent::Vetoed { media_id, fragment }) => {
            out.write_line(&format!(
                "\tSkipping : {} - matches SKIP_LIST entry {:?}",
                style(media_id).yellow(),
                fragment
            ))
            .ok();
        }
        Event::Delete(DeleteEvent::Removing { media }) => {
            out.write_line(&format!(
                "\tRemoving : {} - {}",
                style(media.id).red(),
                media.files.join(", ")
            ))
            .ok();
        }
        Event::Delete(DeleteEvent::Failed { media_id, message }) => {
            out.write_line(&format!(
                "\t{} Failed to remove media item {}: {}",
                style("✗").red().bold(),
                media_id,
                message
            ))
            .ok();
        }
        Event::Pipeline(PipelineEvent::Completed { summary }) => {
            print_summary(out, &summary);
        }
        _ => {}
    }
}

fn print_summary(term: &Term, summary: &RunSummary) {
    term.write_line("").ok();
    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} duplicate groups found in {:.1}s",
        style(summary.groups_found).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} resolved, {} skipped, {} without a clear keeper",
        style(summary.groups_resolved).cyan(),
        style(summary.groups_skipped).cyan(),
        style(summary.groups_unresolved).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} copies deleted, {} failed, {} protected by the skip list",
        style(summary.deleted).cyan(),
        style(summary.delete_failures).cyan(),
        style(summary.vetoed).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} reclaimed",
        style(format_bytes(summary.reclaimed_bytes)).yellow()
    ))
    .ok();
    term.write_line("").ok();
}

fn print_problems(term: &Term, result: &PipelineResult, verbose: bool) {
    if result.errors.is_empty() {
        return;
    }

    term.write_line(&format!(
        "{} {} problem(s) during the run",
        style("!").yellow().bold(),
        result.errors.len()
    ))
    .ok();
    if verbose {
        for error in &result.errors {
            term.write_line(&format!("  {}", style(error).dim())).ok();
        }
    }
}
