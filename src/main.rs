// Command-line entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bannerweb_fetch::config::{DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_OUT_DIR};
use bannerweb_fetch::cache::DEFAULT_CACHE_DIR;
use bannerweb_fetch::logging::init_logging;
use bannerweb_fetch::{FetchConfig, Harvester};

#[derive(Parser)]
#[command(
    name = "bannerweb-fetch",
    about = "Fetch course schedules from a Banner self-service portal",
    version
)]
struct Cli {
    /// Portal root URL.
    #[arg(long, env = "BANNERWEB_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Directory for cached responses.
    #[arg(long, env = "BANNERWEB_CACHE_DIR", default_value = DEFAULT_CACHE_DIR, global = true)]
    cache_dir: PathBuf,

    /// Directory for JSON output.
    #[arg(long, env = "BANNERWEB_OUT_DIR", default_value = DEFAULT_OUT_DIR, global = true)]
    out_dir: PathBuf,

    /// Maximum concurrent course detail fetches.
    #[arg(long, env = "BANNERWEB_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY, global = true)]
    concurrency: usize,

    /// Log debug output (cache hits, retries).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every course in one term.
    Fetch {
        /// Six-digit term code, e.g. 202402.
        term: String,
    },

    /// Fetch the most recent terms, newest first.
    FetchLast {
        /// Number of terms.
        count: usize,
    },

    /// List known terms.
    ListTerms {
        /// Print term codes on one line, separated by spaces.
        #[arg(long)]
        space_sep: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let config = FetchConfig {
        base_url: cli.base_url,
        cache_dir: cli.cache_dir,
        out_dir: cli.out_dir,
        concurrency: cli.concurrency,
        ..FetchConfig::default()
    };
    let harvester = Harvester::new(config)?;

    match cli.command {
        Commands::Fetch { term } => {
            harvester.fetch_known_term(&term).await?;
        }
        Commands::FetchLast { count } => {
            harvester.fetch_last(count).await?;
        }
        Commands::ListTerms { space_sep } => {
            let terms = harvester.fetch_term_list().await?;
            if space_sep {
                let codes: Vec<&str> = terms.iter().map(|t| t.code.as_str()).collect();
                println!("{}", codes.join(" "));
            } else {
                for term in &terms {
                    println!("[{}] {}", term.code, term.name);
                }
            }
        }
    }

    Ok(())
}
