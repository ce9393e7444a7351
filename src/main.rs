//! Mini Cache - command-line client
//!
//! Runs one operation against the configured backend:
//!
//! ```text
//! mini_cache set <key> <json> [ttl_secs]
//! mini_cache get <key>
//! mini_cache delete <key>
//! ```
//!
//! The default memory backend lives only for one invocation, so a `get`
//! never sees an earlier `set`. Run with `CACHE_BACKEND=mongodb` to keep
//! values across invocations.

use std::process;
use std::time::Duration;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::{error, info};

use mini_cache::{cache, logging, Config};

const USAGE: &str = "usage: mini_cache set <key> <json> [ttl_secs] | get <key> | delete <key>\n\
    note: the default memory backend is process-local; \
    set CACHE_BACKEND=mongodb to keep values between runs";

#[derive(Debug)]
enum Command {
    Set {
        key: String,
        value: Value,
        ttl: Option<Duration>,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        match args {
            [op, key, value, rest @ ..] if op == "set" && rest.len() <= 1 => {
                let value = serde_json::from_str(value).context("value must be valid JSON")?;
                let ttl = rest
                    .first()
                    .map(|secs| secs.parse().map(Duration::from_secs))
                    .transpose()
                    .context("ttl must be a number of seconds")?;
                Ok(Command::Set {
                    key: key.clone(),
                    value,
                    ttl,
                })
            }
            [op, key] if op == "get" => Ok(Command::Get { key: key.clone() }),
            [op, key] if op == "delete" => Ok(Command::Delete { key: key.clone() }),
            _ => bail!(USAGE),
        }
    }
}

/// Main entry point for the Mini Cache client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the configured cache store
/// 4. Run the requested operation
#[tokio::main]
async fn main() {
    logging::init_tracing("mini_cache=info");

    if let Err(err) = run().await {
        error!(error = %format!("{err:#}"), "mini_cache failed");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, default_ttl={}s, cleanup_interval={}s",
        config.backend, config.default_ttl, config.cleanup_interval
    );

    let store = cache::open::<Value>(&config)
        .await
        .context("failed to open cache store")?;

    match command {
        Command::Set { key, value, ttl } => {
            store.set(&key, &value, ttl).await?;
            info!(key = %key, "stored");
        }
        Command::Get { key } => {
            let value = store.fetch(&key).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Delete { key } => {
            store.delete(&key).await?;
            info!(key = %key, "deleted");
        }
    }

    Ok(())
}
