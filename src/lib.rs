//! # msrv
//!
//! Microservice management CLI. Wraps the local Docker Compose workflow and
//! remote Docker Swarm deployments over SSH behind a few subcommands, and
//! registers the local development domain in the hosts file.
//!
//! ## Commands
//!
//! - `register-hosts [HOSTNAME]` maps a hostname to `127.0.0.1`
//! - `up [--prod]` starts the local stack or deploys the production stack
//! - `down [--prod]` tears the local stack down or removes the remote stack
//!
//! Each command is a fixed sequence of external invocations that stops at
//! the first failure and exits with that step's status.
//!
//! ## Example
//!
//! ```no_run
//! use msrv::{config::Config, core::deploy::Deployer, utils::ProcessRunner};
//!
//! let config = Config::default();
//! Deployer::new(&config, ProcessRunner::new(false)).up_local()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity.
///
/// `RUST_LOG` takes precedence over the `--debug` default when set.
pub fn setup_logging(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
