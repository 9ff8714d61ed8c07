//! autoscore CLI
//!
//! Inspect review-catalog resolution against a local SQLite database or the
//! hosted catalog API.

mod backend;
mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

pub(crate) use error::CliError;

use commands::config::{run_config_path, run_config_show};
use commands::db::{run_db_init, run_db_seed, run_db_stats};
use commands::lookup::{run_brand, run_context, run_families, run_path};
use commands::reviews::{run_duel, run_reviews};

#[derive(Parser)]
#[command(name = "autoscore")]
#[command(about = "Resolve review-catalog slugs and fetch reviews", long_about = None)]
struct Cli {
    /// Use a local SQLite review database instead of the catalog API
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a brand slug to its canonical name
    Brand {
        /// Brand slug (e.g., citroen)
        slug: String,
    },

    /// Resolve a composite slug (brand_family_year_model)
    Context {
        /// Composite slug (e.g., porsche_911_2022_gt3)
        slug: String,
    },

    /// Resolve a segment-per-level catalog path
    Path {
        /// Segments: <brand> <family> [year] [model] [powertrain]
        #[arg(num_args = 2..=5, required = true)]
        segments: Vec<String>,
    },

    /// List the families of a brand, most reviewed first
    Families {
        /// Brand slug
        brand: String,
    },

    /// Fetch reviews for one or more composite slugs in a single query
    Reviews {
        #[arg(required = true)]
        slugs: Vec<String>,
    },

    /// Fetch reviews for both sides of a comparison (a-vs-b)
    Duel {
        /// Comparison segment (e.g., porsche_911_2022_gt3-vs-ferrari_f8_2020_tributo)
        pair: String,
    },

    /// Manage a local review database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show catalog API configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Create an empty database (or migrate an existing one)
    Init { path: PathBuf },

    /// Load reviews from a JSON array of review rows
    Seed { path: PathBuf, json: PathBuf },

    /// Show row counts
    Stats { path: PathBuf },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration and where each value comes from
    Show,

    /// Print the config file path
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = cli.db.as_deref();
    match cli.command {
        Commands::Brand { slug } => run_brand(db, &slug),
        Commands::Context { slug } => run_context(db, &slug),
        Commands::Path { segments } => run_path(db, &segments),
        Commands::Families { brand } => run_families(db, &brand),
        Commands::Reviews { slugs } => run_reviews(db, &slugs),
        Commands::Duel { pair } => run_duel(db, &pair),
        Commands::Db { action } => match action {
            DbAction::Init { path } => run_db_init(&path),
            DbAction::Seed { path, json } => run_db_seed(&path, &json),
            DbAction::Stats { path } => run_db_stats(&path),
        },
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => run_config_show(),
                ConfigAction::Path => run_config_path(),
            }
            Ok(())
        }
    }
}

/// Info lines are plain command output; other levels carry a prefix.
/// `RUST_LOG` overrides the flag-derived level.
fn init_logger(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}
