//! CHX CLI Client
//!
//! Command-line interface for interacting with a CHX server.

use clap::{Parser, Subcommand};
use chx::{ChxClient, ClientConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// CHX CLI
#[derive(Parser, Debug)]
#[command(name = "chx-cli")]
#[command(about = "CLI for the CHX key-value server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = chx::config::DEFAULT_ADDR)]
    server: String,

    /// Read timeout in milliseconds (0 = wait forever)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
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
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.timeout_ms)
        .build();

    let client = match ChxClient::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.command {
        Commands::Get { key } => client.get(&key).map(|value| match value {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        }),
        Commands::Set { key, value } => client.set(&key, &value).map(|()| println!("OK")),
        Commands::Del { key } => client.delete(&key).map(|()| println!("OK")),
    };

    if let Err(e) = client.close() {
        tracing::debug!("Error closing client: {}", e);
    }

    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
