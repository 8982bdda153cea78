//! Command implementations for the CLI

use crate::{
    cli::Command,
    config::Config,
    core::{deploy::Deployer, hosts::HostsFileEditor},
    error::Result,
    utils::{output, process::CommandRunner},
};
use tracing::{debug, instrument};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config, runner))]
pub fn execute_command<R: CommandRunner>(
    config: &Config,
    command: &Command,
    runner: R,
) -> Result<()> {
    match command {
        Command::RegisterHosts { hostname, .. } => {
            execute_register_hosts_command(config, hostname.as_deref(), runner)
        }
        Command::Up { prod } => {
            let deployer = Deployer::new(config, runner);
            if *prod {
                deployer.up_prod()
            } else {
                deployer.up_local()
            }
        }
        Command::Down { prod } => {
            let deployer = Deployer::new(config, runner);
            if *prod {
                deployer.down_prod()
            } else {
                deployer.down_local()
            }
        }
    }
}

/// Execute the register-hosts command
#[instrument(skip(config, runner))]
fn execute_register_hosts_command<R: CommandRunner>(
    config: &Config,
    hostname: Option<&str>,
    runner: R,
) -> Result<()> {
    let hostname = hostname.unwrap_or(&config.local_domain);
    output::info("--- Host Registration Utility ---");

    let editor = HostsFileEditor::new(&config.hosts_file, config.loopback_ip, runner);
    let outcome = editor.register(hostname)?;
    debug!(?outcome, "Host registration finished");
    Ok(())
}
