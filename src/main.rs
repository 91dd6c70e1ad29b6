//! Command-line interface for the spreadsheet-backed conlang dictionaries.
//!
//! This CLI searches a dictionary sheet the way the chat bot does, shows a
//! random entry, and exports snapshots for offline use.

use clap::{Parser, Subcommand};
use colored::*;
use conlang_dict::{
    Config, Dictionary, DictionaryKind, Embed, Record, Row, SearchResult, SesameWord,
    ThravelemehWord, Word,
    error::Result,
    sheet::{self, FileSource, RowSource, SheetsSource},
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, error, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Conlang dictionary lookup CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Which dictionary to use
    #[arg(short, long, global = true, value_enum, default_value_t = DictionaryKind::Main)]
    dict: DictionaryKind,

    /// Read rows from a JSON snapshot file instead of the spreadsheet
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Read rows from the default snapshot written by `snapshot`
    #[arg(long, global = true, default_value_t = false, conflicts_with = "file")]
    offline: bool,

    /// Set verbosity level (use -v, -vv, or -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the dictionary for a word or definition
    Search {
        /// The text to look for
        query: String,
        /// Print the chat embed as JSON instead of formatted text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show a random entry
    Random,
    /// Save the current sheet contents as a JSON snapshot
    Snapshot {
        /// Output path (defaults to the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Sets up logging based on verbosity level.
fn setup_logging(verbose: u8) {
    let log_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter(None, log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Either the live sheet or a snapshot on disk.
enum CliSource {
    Sheets(SheetsSource),
    File(FileSource),
}

impl RowSource for CliSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        match self {
            CliSource::Sheets(source) => source.fetch_rows().await,
            CliSource::File(source) => source.fetch_rows().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            CliSource::Sheets(source) => source.describe(),
            CliSource::File(source) => source.describe(),
        }
    }
}

fn build_source(cli: &Cli, config: &Config) -> Result<CliSource> {
    if let Some(path) = &cli.file {
        return Ok(CliSource::File(FileSource::new(path)));
    }
    if cli.offline {
        let path = sheet::default_snapshot_path(cli.dict.name())?;
        return Ok(CliSource::File(FileSource::new(path)));
    }
    Ok(CliSource::Sheets(SheetsSource::new(
        config.sheet_id(cli.dict)?,
        config.range.clone(),
        config.auth()?.clone(),
    )))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn open<R: Record>(source: CliSource, threshold: Duration) -> Result<Dictionary<R, CliSource>> {
    let pb = spinner(format!("Loading {}...", source.describe()));
    let dict = Dictionary::load(source, threshold).await;
    pb.finish_and_clear();
    dict
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };

    let source = match build_source(&cli, &config) {
        Ok(source) => source,
        Err(e) => {
            error!("Could not set up row source: {}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };
    let threshold = config.threshold(cli.dict);

    match cli.command {
        Commands::Search { query, json } => {
            let outcome = match cli.dict {
                DictionaryKind::Main => handle_search::<Word>(source, threshold, &query, json).await,
                DictionaryKind::Thravelemeh => {
                    handle_search::<ThravelemehWord>(source, threshold, &query, json).await
                }
                DictionaryKind::Sesame => {
                    handle_search::<SesameWord>(source, threshold, &query, json).await
                }
            };
            if let Err(e) = outcome {
                error!("Error during search command: {}", e);
                eprintln!("{}", format!("Error searching '{}': {}", query, e).red());
                std::process::exit(1);
            }
        }
        Commands::Random => {
            let outcome = match cli.dict {
                DictionaryKind::Main => handle_random::<Word>(source, threshold).await,
                DictionaryKind::Thravelemeh => {
                    handle_random::<ThravelemehWord>(source, threshold).await
                }
                DictionaryKind::Sesame => handle_random::<SesameWord>(source, threshold).await,
            };
            if let Err(e) = outcome {
                error!("Error during random command: {}", e);
                eprintln!("{}", format!("Error getting random word: {}", e).red());
                std::process::exit(1);
            }
        }
        Commands::Snapshot { out } => {
            if let Err(e) = handle_snapshot(source, cli.dict, out).await {
                error!("Error during snapshot command: {}", e);
                eprintln!("{}", format!("Error writing snapshot: {}", e).red());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Handles the search command by printing matches, or the embed JSON.
async fn handle_search<R: Record>(
    source: CliSource,
    threshold: Duration,
    query: &str,
    json: bool,
) -> Result<()> {
    info!("Searching for '{}'", query);
    let mut dict = open::<R>(source, threshold).await?;
    let result = dict.search(query).await?;

    if json {
        let embed = Embed::from_search(query, &result);
        println!("{}", serde_json::to_string_pretty(&embed)?);
        return Ok(());
    }

    if result.records.is_empty() {
        println!("No entries found for '{}'.", query.yellow());
        return Ok(());
    }

    print_result(&result);
    Ok(())
}

/// Prints every matched record; exact matches are highlighted.
fn print_result<R: Record>(result: &SearchResult<R>) {
    println!(
        "{} {}",
        result.records.len().to_string().bold(),
        "match(es)".dimmed()
    );
    for field in result.fields() {
        let plain = strip_markup(&field.name);
        if field.inline {
            println!("\n{}", plain.bold().cyan());
        } else {
            println!("\n{}", plain.bold().green());
        }
        for line in field.value.lines() {
            println!("  {}", line);
        }
    }
}

/// Drops the chat markup (`**`, `__`) from a field name for terminal output.
fn strip_markup(name: &str) -> String {
    name.replace("**", "").replace("__", "")
}

async fn handle_random<R: Record>(source: CliSource, threshold: Duration) -> Result<()> {
    info!("Getting random word...");
    let mut dict = open::<R>(source, threshold).await?;
    let record = dict.random_record().await?;
    let field = record.to_field(false);
    println!("Random word: {}", strip_markup(&field.name).bold().cyan());
    for line in field.value.lines() {
        println!("  {}", line);
    }
    Ok(())
}

async fn handle_snapshot(source: CliSource, kind: DictionaryKind, out: Option<PathBuf>) -> Result<()> {
    let path = match out {
        Some(path) => path,
        None => sheet::default_snapshot_path(kind.name())?,
    };
    let pb = spinner(format!("Fetching {}...", source.describe()));
    let rows = source.fetch_rows().await;
    pb.finish_and_clear();
    let rows = rows?;

    sheet::write_snapshot(&path, &rows).await?;
    println!(
        "{}",
        format!("Saved {} rows of the {} dictionary to {:?}", rows.len(), kind, path).green()
    );
    Ok(())
}
