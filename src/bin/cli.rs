//! triekv CLI
//!
//! Command-line access to a local triekv log file.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use triekv::command::{Command, Response};
use triekv::{Config, IndexKind, LogStore, SyncStrategy};

/// triekv CLI
#[derive(Parser, Debug)]
#[command(name = "triekv")]
#[command(about = "Embedded append-only key-value store")]
#[command(version)]
struct Args {
    /// Log file
    #[arg(short, long, default_value = "./triekv.log")]
    file: String,

    /// Index to rebuild on open
    #[arg(short, long, value_enum, default_value_t = IndexArg::Radix)]
    index: IndexArg,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexArg {
    Hash,
    Sorted,
    Radix,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Hash => IndexKind::Hash,
            IndexArg::Sorted => IndexKind::Sorted,
            IndexArg::Radix => IndexKind::Radix,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List live keys
    Keys,

    /// Print index and file statistics
    Stats,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,triekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::Manual
    };
    let config = Config::builder()
        .path(&args.file)
        .index(args.index.into())
        .sync_strategy(sync_strategy)
        .build();

    let store = match LogStore::open_with(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", args.file, e);
            process::exit(1);
        }
    };

    let command = match args.command {
        Commands::Get { key } => Command::Get { key: key.into_bytes() },
        Commands::Put { key, value } => Command::Put {
            key: key.into_bytes(),
            value: value.into_bytes(),
        },
        Commands::Del { key } => Command::Delete { key: key.into_bytes() },
        Commands::Keys => Command::Keys,
        Commands::Stats => {
            println!("file:        {}", store.path().display());
            println!("index:       {}", store.config().index.name());
            println!("keys:        {}", store.num_keys());
            println!("bytes:       {}", store.write_offset());
            println!("lex ordered: {}", store.is_lex_ordered());
            return;
        }
    };

    match store.execute(command) {
        Ok(Response::Ok) => {}
        Ok(Response::Value(value)) => println!("{}", String::from_utf8_lossy(&value)),
        Ok(Response::NotFound) => {
            eprintln!("(not found)");
            process::exit(2);
        }
        Ok(Response::Keys(keys)) => {
            for key in keys {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}
