//! # Zenote - Markdown Note Tools
//!
//! Command-line access to the note editing core: run toolbar commands on a
//! file, search it, split it into export cards.
//!
//! ## Quick Start
//!
//! ```bash
//! # Bold the word at chars 6..11
//! echo "Hello world." | cargo run -- apply bold --start 6 --end 11
//!
//! # Split a note into 3:4 cards
//! cargo run -- paginate notes/trip.md --mode 3:4 --json
//!
//! # Search, case-insensitively
//! cargo run -- search "todo" notes/trip.md
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zenote_buffer::{Match, Selection, find};
use zenote_core::{Command, CommandEngine, Config, ControlEffect, SystemClock, derive_title};
use zenote_export::{ExportFormat, ExportSettings, PageMode, Paginator, file_name};

/// Zenote - markdown note tools
#[derive(Parser, Debug)]
#[command(name = "zenote")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Cmd,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a toolbar command on a note
    Apply {
        /// Command id (bold, h2, list-ordered, date, ...)
        command: Command,

        /// Note to read (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Selection start, in chars
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Selection end, in chars (defaults to the start)
        #[arg(long)]
        end: Option<usize>,

        /// Print JSON instead of the new text
        #[arg(long)]
        json: bool,
    },

    /// Find every case-insensitive occurrence of a query
    Search {
        query: String,

        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Split a note into export cards
    Paginate {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Card shape: full or 3:4 (defaults to the config)
        #[arg(long)]
        mode: Option<PageMode>,

        /// Weight limit per card (defaults to the mode's)
        #[arg(long)]
        capacity: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Print the title derived from a note's first line
    Title {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the file name a note exports under
    ExportName {
        title: String,

        /// md or txt
        #[arg(long, default_value = "md")]
        format: ExportFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Serialize)]
struct ApplyOutput {
    text: String,
    title: String,
    selection: Selection,
    history_changed: bool,
    effect: Option<&'static str>,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    matches: Vec<Match>,
}

#[derive(Serialize)]
struct PaginateOutput {
    mode: PageMode,
    pages: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    tracing::info!("Starting Zenote v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref())?;
    let output = run(args.command, &config)?;
    print!("{output}");

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load()),
    }
}

/// Runs one subcommand and returns what it prints.
fn run(command: Cmd, config: &Config) -> anyhow::Result<String> {
    match command {
        Cmd::Apply {
            command,
            file,
            start,
            end,
            json,
        } => {
            let text = read_input(file.as_deref())?;
            // Taken as given so a reversed range is rejected, not swapped
            let selection = Selection {
                start,
                end: end.unwrap_or(start),
            };
            apply(command, &text, selection, config, json)
        }
        Cmd::Search { query, file, json } => {
            let text = read_input(file.as_deref())?;
            search(&query, &text, json)
        }
        Cmd::Paginate {
            file,
            mode,
            capacity,
            json,
        } => {
            let text = read_input(file.as_deref())?;
            let settings = ExportSettings {
                mode: mode.unwrap_or(config.export.mode),
                capacity: capacity.or(config.export.capacity),
            };
            paginate(&text, settings, json)
        }
        Cmd::Title { file } => {
            let text = read_input(file.as_deref())?;
            Ok(format!("{}\n", derive_title(&text)))
        }
        Cmd::ExportName { title, format } => Ok(format!("{}\n", file_name(&title, format))),
        Cmd::Config => Ok(toml::to_string_pretty(config)?),
    }
}

fn apply(
    command: Command,
    text: &str,
    selection: Selection,
    config: &Config,
    json: bool,
) -> anyhow::Result<String> {
    let mut engine = CommandEngine::new(text, &config.editor, Arc::new(SystemClock));
    let dispatch = engine
        .dispatch(command, text, selection)
        .with_context(|| format!("Cannot run '{command}'"))?;

    if !json {
        return Ok(dispatch.text);
    }

    let effect = dispatch.effect.map(|effect| match effect {
        ControlEffect::ToggleSearch => "toggle-search",
        ControlEffect::HideKeyboard => "hide-keyboard",
        ControlEffect::DeleteNote => "delete-note",
        ControlEffect::FontSize => "font-size",
    });
    let output = ApplyOutput {
        text: dispatch.text,
        title: dispatch.title,
        selection: dispatch.selection,
        history_changed: dispatch.history_changed,
        effect,
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

fn search(query: &str, text: &str, json: bool) -> anyhow::Result<String> {
    let matches = find(query, text);
    if json {
        let output = SearchOutput { query, matches };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    Ok(matches
        .iter()
        .map(|m| format!("{}..{}\t{}\n", m.start, m.end, m.selection().extract(text)))
        .collect())
}

fn paginate(text: &str, settings: ExportSettings, json: bool) -> anyhow::Result<String> {
    let pages = Paginator::new(settings.mode).paginate(text, settings.capacity());
    tracing::info!(pages = pages.len(), mode = %settings.mode, "paginated");

    if json {
        let output = PaginateOutput {
            mode: settings.mode,
            pages,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    let total = pages.len();
    Ok(pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("--- page {}/{total} ---\n{page}\n", i + 1))
        .collect())
}

/// Reads a note from `path`, or from stdin when there is none.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn note_file(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn run_args(argv: &[&str]) -> String {
        let args = Args::parse_from(argv);
        run(args.command, &Config::default()).unwrap()
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "zenote", "-vv", "apply", "bold", "--start", "6", "--end", "11",
        ]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Cmd::Apply {
                command, start, end, file, ..
            } => {
                assert_eq!(command, Command::Bold);
                assert_eq!((start, end), (6, Some(11)));
                assert!(file.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Args::try_parse_from(["zenote", "apply", "sparkle"]).is_err());
        assert!(Args::try_parse_from(["zenote", "paginate", "--mode", "16:9"]).is_err());
    }

    #[test]
    fn test_apply_bold() {
        let (_dir, path) = note_file("Hello world.");
        let path = path.to_str().unwrap();
        assert_eq!(
            run_args(&["zenote", "apply", "bold", path, "--start", "6", "--end", "11"]),
            "Hello **world**."
        );

        let json = run_args(&[
            "zenote", "apply", "bold", path, "--start", "6", "--end", "11", "--json",
        ]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["selection"]["start"], 8);
        assert_eq!(value["selection"]["end"], 13);
        assert_eq!(value["effect"], serde_json::Value::Null);
        assert_eq!(value["title"], "Hello world.");
    }

    #[test]
    fn test_apply_control_command_reports_effect() {
        let (_dir, path) = note_file("text");
        let json = run_args(&["zenote", "apply", "search", path.to_str().unwrap(), "--json"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text"], "text");
        assert_eq!(value["effect"], "toggle-search");
    }

    #[test]
    fn test_apply_out_of_bounds_fails() {
        let (_dir, path) = note_file("abc");
        let path = path.to_str().unwrap();
        let args = Args::parse_from(["zenote", "apply", "bold", path, "--end", "9"]);
        assert!(run(args.command, &Config::default()).is_err());
    }

    #[test]
    fn test_apply_reversed_selection_fails() {
        let (_dir, path) = note_file("Hello world.");
        let path = path.to_str().unwrap();
        let args = Args::parse_from([
            "zenote", "apply", "bold", path, "--start", "11", "--end", "6",
        ]);
        let err = run(args.command, &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("start 11 is after end 6"));
    }

    #[test]
    fn test_search_output() {
        let (_dir, path) = note_file("Cat cat");
        assert_eq!(
            run_args(&["zenote", "search", "CAT", path.to_str().unwrap()]),
            "0..3\tCat\n4..7\tcat\n"
        );
    }

    #[test]
    fn test_title_and_export_name() {
        let (_dir, path) = note_file("# My **Trip**\nday one");
        assert_eq!(run_args(&["zenote", "title", path.to_str().unwrap()]), "My Trip\n");
        assert_eq!(
            run_args(&["zenote", "export-name", "My Trip", "--format", "txt"]),
            "zenote_my_trip.txt\n"
        );
    }

    #[test]
    fn test_paginate_json() {
        let (_dir, path) = note_file("# Title\n\nSome text.\n\nMore text.");
        let json = run_args(&["zenote", "paginate", path.to_str().unwrap(), "--json"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "full");
        assert_eq!(value["pages"], serde_json::json!(["# Title\n\nSome text.\n\nMore text."]));
    }

    #[test]
    fn test_paginate_uses_config_mode() {
        let mut config = Config::default();
        config.export.mode = PageMode::ThreeFour;
        config.export.capacity = Some(10);

        let (_dir, path) = note_file("aaaaaaaaaa\nbbbbbbbbbb");
        let args = Args::parse_from(["zenote", "paginate", path.to_str().unwrap()]);
        let output = run(args.command, &config).unwrap();
        assert_eq!(
            output,
            "--- page 1/2 ---\naaaaaaaaaa\n\n--- page 2/2 ---\nbbbbbbbbbb\n"
        );
    }

    #[test]
    fn test_config_file_option() {
        let (_dir, path) = note_file("[editor]\nfont_size = 20\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.editor.font_size, 20);

        let printed = run(Cmd::Config, &config).unwrap();
        assert!(printed.contains("font_size = 20"));

        assert!(load_config(Some(Path::new("/nonexistent/zenote.toml"))).is_err());
    }

    proptest! {
        #[test]
        fn prop_paginate_json_pages_cover_input(
            text in "[a-z .\n]{0,200}",
            capacity in 1usize..80,
        ) {
            let settings = ExportSettings { mode: PageMode::Full, capacity: Some(capacity) };
            let json = paginate(&text, settings, true).unwrap();
            let value: PaginateJson = serde_json::from_str(&json).unwrap();
            let joined = value.pages.concat();
            prop_assert!(text.starts_with(&joined));
            prop_assert!(text[joined.len()..].trim().is_empty());
        }
    }

    #[derive(serde::Deserialize)]
    struct PaginateJson {
        pages: Vec<String>,
    }
}
