//! census-store CLI
//!
//! Command-line interface over a local registry directory.

use clap::{Parser, Subcommand};
use census_store::config::{Config, SyncStrategy};
use census_store::intake::CandidateFields;
use census_store::report::{Outcome, Status};
use census_store::Registry;
use tracing_subscriber::{fmt, EnvFilter};

/// census-store CLI
#[derive(Parser, Debug)]
#[command(name = "census-cli")]
#[command(about = "Person records with a cuckoo hash index")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./census_data")]
    data_dir: String,

    /// Slots per index table (must match an existing index file)
    #[arg(short, long, default_value = "524287")]
    capacity: u32,

    /// Displacement budget per insertion pass
    #[arg(long, default_value = "500")]
    max_attempts: usize,

    /// Refuse inserts once this load factor is reached
    #[arg(long, default_value = "0.9")]
    max_load_factor: f64,

    /// Only fsync the data file on close
    #[arg(long)]
    lazy_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and insert a person
    Insert {
        /// National ID (8 digits)
        key: u32,
        #[arg(long)]
        first_names: String,
        #[arg(long)]
        last_names: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        province: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        district: String,
        #[arg(long)]
        location: String,
        /// 9 digits starting with 9
        #[arg(long)]
        phone: String,
        /// [letters-digits]@g.com
        #[arg(long)]
        email: String,
        /// 1 Single, 2 Married, 3 Divorced, 4 Widowed
        #[arg(long)]
        marital: u8,
    },

    /// Show a person by key
    Get {
        key: u32,
    },

    /// Logically delete a person by key
    Delete {
        key: u32,
    },

    /// Show index load and table occupancy
    Stats,

    /// Persist the index now
    Save,

    /// Rebuild the index from the data file
    Rebuild,

    /// Re-read the index file and check its integrity
    Verify,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,census_store=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .table_capacity(args.capacity)
        .max_attempts(args.max_attempts)
        .max_load_factor(args.max_load_factor)
        .sync_strategy(if args.lazy_sync {
            SyncStrategy::OnClose
        } else {
            SyncStrategy::EveryWrite
        })
        .build();

    let registry = match Registry::open(config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to open registry: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.command {
        Commands::Insert {
            key,
            first_names,
            last_names,
            department,
            province,
            city,
            district,
            location,
            phone,
            email,
            marital,
        } => {
            let candidate = CandidateFields {
                key,
                first_names,
                last_names,
                department,
                province,
                city,
                district,
                location,
                phone,
                email,
                marital_option: marital,
            };
            Some(Outcome::from_insert(key, registry.register(&candidate)))
        }
        Commands::Get { key } => Some(Outcome::from_get(key, registry.get(key))),
        Commands::Delete { key } => Some(Outcome::from_delete(key, registry.delete(key))),
        Commands::Stats => {
            let stats = registry.stats();
            println!("records in data file: {}", stats.records);
            println!("indexed keys:         {}", stats.indexed);
            println!(
                "slots:                {} ({} per table)",
                stats.total_slots, stats.table_capacity
            );
            println!("load factor:          {:.4}", stats.load_factor);
            for (table, occupied) in stats.table_occupancy.iter().enumerate() {
                println!("  table {table}: {occupied} occupied");
            }
            None
        }
        Commands::Save => Some(Outcome::from_save(registry.save_index())),
        Commands::Rebuild => match registry.rebuild_index() {
            Ok(stats) => {
                println!(
                    "rebuilt: {} scanned, {} indexed, {} inactive, {} corrupt, {} superseded, {} failed",
                    stats.scanned,
                    stats.indexed,
                    stats.inactive,
                    stats.corrupt,
                    stats.superseded,
                    stats.failed
                );
                None
            }
            Err(e) => Some(Outcome::Failed {
                reason: e.to_string(),
            }),
        },
        Commands::Verify => Some(Outcome::from_load(registry.reload_index())),
    };

    let mut status = Status::Ok;
    if let Some(outcome) = outcome {
        println!("{outcome}");
        status = outcome.status();
    }

    if let Err(e) = registry.close() {
        tracing::error!("Failed to close registry: {}", e);
        std::process::exit(1);
    }

    std::process::exit(status as i32);
}
