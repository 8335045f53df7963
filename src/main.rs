//! json-probe: run key, path or pattern searches against a JSON file from the shell.

use std::process;

use clap::{Parser, Subcommand};
use json_probe::{load_options, read_json_input, MaxDepth, Search, SearchOptions};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

#[derive(Parser)]
#[command(name = "json-probe")]
#[command(about = "Search a JSON document by key, path or key pattern")]
struct Args {
    /// JSON document to search, or `-` for stdin
    file: String,

    /// Compare keys without regard to case
    #[arg(long)]
    case_insensitive: bool,

    /// Maximum number of levels below the root to search
    #[arg(long)]
    max_depth: Option<usize>,

    /// Path delimiter
    #[arg(long)]
    delimiter: Option<String>,

    /// Disable the result cache
    #[arg(long)]
    no_cache: bool,

    /// JSON file with search options (flags take precedence)
    #[arg(long)]
    options: Option<String>,

    /// Print search statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Logging level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find entries by key
    Find {
        key: String,
        /// first, last or all
        #[arg(long, default_value = "first")]
        mode: String,
    },
    /// Resolve a single delimiter-joined path
    Path { path: String },
    /// Find entries whose key matches a regular expression
    Keys { pattern: String },
}

fn main() {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let options = build_options(&args)?;
    let document = read_json_input(&args.file).map_err(|e| e.to_string())?;
    let search = Search::from_json(document, options).map_err(|e| e.to_string())?;
    debug!(file = %args.file, "document loaded");

    match &args.command {
        Command::Find { key, mode } => {
            let found = search.find_with_mode(key, mode).map_err(|e| e.to_string())?;
            print_json(&found)?;
        }
        Command::Path { path } => {
            let found = search.find_by_path(path).map_err(|e| e.to_string())?;
            print_json(&found)?;
        }
        Command::Keys { pattern } => {
            let re = Regex::new(pattern).map_err(|e| format!("invalid pattern: {e}"))?;
            print_json(&search.find_keys_matching(&re))?;
        }
    }

    if args.stats {
        let stats = serde_json::to_string_pretty(&search.statistics()).map_err(|e| e.to_string())?;
        eprintln!("{stats}");
    }
    Ok(())
}

fn build_options(args: &Args) -> Result<SearchOptions, String> {
    let base = match &args.options {
        Some(path) => load_options(path).map_err(|e| format!("options file {path}: {e}"))?,
        None => SearchOptions::new(),
    };

    let mut flags = SearchOptions::new();
    if args.case_insensitive {
        flags.case_sensitive = Some(false);
    }
    if let Some(depth) = args.max_depth {
        flags.max_depth = Some(MaxDepth::Limited(depth));
    }
    if let Some(delimiter) = &args.delimiter {
        flags.path_delimiter = Some(delimiter.clone());
    }
    if args.no_cache {
        flags.caching = Some(false);
    }
    Ok(base.merge(flags))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}
