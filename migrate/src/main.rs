//! prompts-migrate CLI - turn the questions CSV into a prompts migration
//!
//! ```bash
//! prompts-migrate                                  # default paths (or .env)
//! prompts-migrate questions.csv                    # custom input
//! prompts-migrate questions.csv out/053.sql        # custom input and output
//! prompts-migrate questions.csv --stdout | psql    # pipe the SQL
//! prompts-migrate questions.csv out.sql --json     # machine-readable report
//! ```

use clap::Parser;
use prompts_migrate::config::{self, Paths};
use prompts_migrate::generate_migration;
use prompts_migrate::logs::{log_error, LOGGER};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prompts-migrate")]
#[command(about = "Generate the prompts table SQL migration from a questions CSV", long_about = None)]
struct Cli {
    /// Questions CSV (default: $PROMPTS_CSV_PATH or questions.csv)
    input: Option<PathBuf>,

    /// SQL file to write (default: $PROMPTS_MIGRATION_PATH or the supabase migration)
    output: Option<PathBuf>,

    /// Print the SQL to stdout instead of writing a file
    #[arg(long, conflicts_with = "json")]
    stdout: bool,

    /// Print the run report as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Load .env file (if present)
    config::load_dotenv();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    if let Err(e) = run(cli) {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let paths = Paths::resolve(cli.input, cli.output);
    let output = if cli.stdout { None } else { Some(paths.output.as_path()) };

    let report = generate_migration(&paths.input, output)?;

    if cli.stdout {
        println!("{}", report.sql);
    } else if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
