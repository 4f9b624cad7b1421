//! `filterlink` CLI — encode, decode, and check results-table filter strings.
//!
//! ## Usage
//!
//! ```sh
//! # Predicates (JSON array) → filter string
//! echo '[{"type":"id","values":["abc"]}]' | filterlink encode
//!
//! # Table records instead of predicates, with the table's value domain
//! filterlink encode --table -d domain.json -i filters.json
//!
//! # Filter string → pretty-printed predicates
//! echo '0(0*status*(status(notIn(true))))' | filterlink decode -d domain.json
//!
//! # Validate a filter string and report its canonical form
//! filterlink check -d domain.json -i link.txt
//! ```

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filter_codec::{FilterPredicate, StaticDomain, TableFilter};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "filterlink",
    version,
    about = "Encode and decode results-table filter strings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level log output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON list of filters into a filter string
    Encode {
        /// Value domain JSON file (empty domain if omitted)
        #[arg(short, long)]
        domain: Option<PathBuf>,
        /// Input file (reads from stdin if omitted or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted or `-`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Input is a list of table `{id, value}` records
        #[arg(long)]
        table: bool,
    },
    /// Decode a filter string into a JSON list of filters
    Decode {
        /// Value domain JSON file (empty domain if omitted)
        #[arg(short, long)]
        domain: Option<PathBuf>,
        /// Input file (reads from stdin if omitted or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted or `-`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit table `{id, value}` records instead of predicates
        #[arg(long)]
        table: bool,
    },
    /// Check that a filter string decodes, and whether it is canonical
    Check {
        /// Value domain JSON file (empty domain if omitted)
        #[arg(short, long)]
        domain: Option<PathBuf>,
        /// Input file (reads from stdin if omitted or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(logging::Verbosity::from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Encode {
            domain,
            input,
            output,
            table,
        } => {
            let domain = load_domain(domain.as_deref())?;
            let json = read_text(input.as_deref(), "input")?;
            let text = if table {
                let records: Vec<TableFilter> =
                    serde_json::from_str(&json).context("Failed to parse table filter records")?;
                filter_codec::serialize_table_filters(&records, &domain)
                    .context("Failed to encode table filter records")?
            } else {
                let predicates: Vec<FilterPredicate> =
                    serde_json::from_str(&json).context("Failed to parse filter predicates")?;
                filter_codec::serialize(&predicates, &domain)
            };
            write_text(output.as_deref(), &text)?;
        }
        Commands::Decode {
            domain,
            input,
            output,
            table,
        } => {
            let domain = load_domain(domain.as_deref())?;
            let text = read_text(input.as_deref(), "input")?;
            let predicates = filter_codec::deserialize(text.trim(), &domain)
                .context("Failed to decode filter string")?;
            let pretty = if table {
                let records: Vec<TableFilter> =
                    predicates.iter().map(TableFilter::from_predicate).collect();
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string_pretty(&predicates)?
            };
            write_text(output.as_deref(), &pretty)?;
        }
        Commands::Check { domain, input } => {
            let domain = load_domain(domain.as_deref())?;
            let raw = read_text(input.as_deref(), "input")?;
            let text = raw.trim();
            let predicates = filter_codec::deserialize(text, &domain)
                .context("Failed to decode filter string")?;
            let canonical = filter_codec::serialize(&predicates, &domain);
            if canonical == text {
                println!("ok ({} predicates)", predicates.len());
            } else {
                tracing::info!(
                    input_len = text.len(),
                    canonical_len = canonical.len(),
                    "input is not canonical"
                );
                println!(
                    "non-canonical ({} predicates), canonical form:",
                    predicates.len()
                );
                println!("{}", canonical);
            }
        }
    }

    Ok(())
}

fn load_domain(path: Option<&Path>) -> Result<StaticDomain> {
    let Some(path) = named_path(path) else {
        tracing::debug!("no domain file given, using an empty value domain");
        return Ok(StaticDomain::default());
    };
    let json = read_text(Some(path), "domain")?;
    StaticDomain::from_json(&json)
        .with_context(|| format!("Failed to parse domain file: {}", path.display()))
}

/// `None` and `-` both stand for the standard stream.
fn named_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| *p != Path::new("-"))
}

/// Read a whole file, or stdin when no file is named. `what` names the
/// content in error messages.
fn read_text(path: Option<&Path>, what: &str) -> Result<String> {
    match named_path(path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), what, "reading file");
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {what} file: {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .with_context(|| format!("Failed to read {what} from stdin"))?;
            Ok(buf)
        }
    }
}

/// Write `content` plus a newline to a file, or to stdout when no file is
/// named.
fn write_text(path: Option<&Path>, content: &str) -> Result<()> {
    let (mut sink, target): (Box<dyn Write>, String) = match named_path(path) {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_string()),
    };
    writeln!(sink, "{content}")
        .and_then(|()| sink.flush())
        .with_context(|| format!("Failed to write output to {target}"))
}
