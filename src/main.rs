use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ffa_core::config::Config;
use ffa_core::schema::SchemaKind;

#[derive(Parser)]
#[command(name = "ffa", about = "Food For All — client search and coordinate tools")]
struct Cli {
    /// Write debug logs to $TMPDIR/ffa-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/ffa/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how a search query is tokenized.
    Terms {
        query: String,
    },
    /// Filter exported records with a search query; prints JSON lines.
    Search {
        query: String,
        /// JSON array of records, or an object of id → record.
        #[arg(long, short)]
        records: PathBuf,
        /// `clients` or `users`; defaults to the configured schema.
        #[arg(long, short)]
        schema: Option<SchemaKind>,
    },
    /// Normalize coordinate payloads given as JSON (`[lat,lng]`, `{"lat":..}`).
    Coords {
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Exit with status 1 if any payload is invalid.
        #[arg(long)]
        strict: bool,
    },
}

fn init_debug_log() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("ffa-debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
    tracing::info!(path = %path.display(), "ffa debug log started");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        init_debug_log()?;
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default config");
            Config::defaults()
        }),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Terms { query } => ffa::commands::terms(&query, &mut out),
        Command::Search { query, records, schema } => {
            let records = ffa_core::records::load_records(&records)?;
            let schema = config.search.schema(schema);
            ffa::commands::search(&query, &records, &schema, &config.search, &mut out)?;
            Ok(())
        }
        Command::Coords { inputs, strict } => {
            let report = ffa::commands::coords(&inputs, &config.coordinates, &mut out)?;
            if strict && report.invalid > 0 {
                anyhow::bail!("{} of {} coordinates invalid", report.invalid, inputs.len());
            }
            Ok(())
        }
    }
}
