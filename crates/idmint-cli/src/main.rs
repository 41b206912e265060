//! idmint CLI: allocate and inspect fixed-width identifiers.

use clap::{Parser, Subcommand};
use idmint_core::config::AllocatorConfig;
use idmint_core::id::Ordinal;
use idmint_store::Allocator;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idmint")]
#[command(about = "Allocate unique, never-reissued fixed-width identifiers", long_about = None)]
struct Cli {
    /// Database file holding the counter (overrides IDMINT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate identifiers and print one per line
    Generate {
        /// Identifiers per allocation
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Keep allocating until killed
        #[arg(long)]
        follow: bool,
    },

    /// Print the identifier for an ordinal
    Encode {
        ordinal: u64,
    },

    /// Print the ordinal of an identifier
    Decode {
        identifier: String,
    },

    /// Show the high-water mark and remaining capacity
    Status,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AllocatorConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let result = match cli.command {
        Commands::Generate { count, follow } => generate(&config, count, follow),
        Commands::Encode { ordinal } => encode(&config, ordinal),
        Commands::Decode { identifier } => decode(&config, &identifier),
        Commands::Status => status(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(
    config: &AllocatorConfig,
    count: usize,
    follow: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let allocator = Allocator::open(config)?;
    tracing::debug!(db = %config.db_path, count, follow, "generating identifiers");
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let batch = allocator.generate_bulk(count)?;
        for id in &batch {
            writeln!(out, "{}", id)?;
        }
        // Flush per batch so a killed process has printed everything it was
        // given before the next allocation.
        out.flush()?;

        if !follow {
            return Ok(());
        }
    }
}

fn encode(config: &AllocatorConfig, ordinal: u64) -> Result<(), Box<dyn std::error::Error>> {
    let codec = config.codec()?;
    if ordinal > codec.max_ordinal().get() {
        return Err(format!(
            "ordinal {} is outside the address space (max {})",
            ordinal,
            codec.max_ordinal()
        )
        .into());
    }
    println!("{}", codec.encode(Ordinal::new(ordinal)));
    Ok(())
}

fn decode(config: &AllocatorConfig, identifier: &str) -> Result<(), Box<dyn std::error::Error>> {
    let codec = config.codec()?;
    println!("{}", codec.decode(identifier)?);
    Ok(())
}

fn status(config: &AllocatorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let allocator = Allocator::open(config)?;
    match allocator.high_water()? {
        Some(id) => println!("high_water: {}", id),
        None => println!("high_water: (none)"),
    }
    println!("remaining: {}", allocator.remaining()?);
    println!("space: {}", allocator.codec().space());
    Ok(())
}
