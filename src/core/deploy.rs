//! Stack lifecycle: local Docker Compose and remote Docker Swarm
//!
//! All validation happens before the first command is dispatched. Steps run
//! strictly in order and the first failure ends the sequence; steps that
//! already succeeded are not rolled back.

use crate::{
    config::Config,
    core::remote::{RemoteTarget, resolve_remote_target},
    error::{MsrvError, Result},
    utils::{
        output,
        process::{CommandRunner, ShellCommand},
    },
};
use std::path::Path;
use tracing::{info, instrument};

/// Initializes swarm mode only when the engine is not already a swarm node.
/// Check and init are not atomic across concurrent deploys.
const SWARM_INIT_SCRIPT: &str = concat!(
    r#"if [ "$(docker info --format '{{.Swarm.LocalNodeState}}')" != "active" ]; then "#,
    "docker swarm init; ",
    "else echo 'Swarm is already active'; fi"
);

/// Brings stacks up and down through a [`CommandRunner`]
pub struct Deployer<'a, R> {
    config: &'a Config,
    runner: R,
}

impl<'a, R: CommandRunner> Deployer<'a, R> {
    pub const fn new(config: &'a Config, runner: R) -> Self {
        Self { config, runner }
    }

    /// Start the local development stack
    #[instrument(skip(self))]
    pub fn up_local(&self) -> Result<()> {
        let compose_file = &self.config.dev_compose_file;
        require_file(compose_file)?;

        output::success("Starting local dev environment...");
        self.runner.run(&compose_up(compose_file))?;

        output::success(&format!(
            "\nLocal Dev running at {}",
            self.config.local_url()
        ));
        Ok(())
    }

    /// Tear down the local stack and its volumes. No confirmation.
    #[instrument(skip(self))]
    pub fn down_local(&self) -> Result<()> {
        output::warn("Stopping local dev and removing volumes...");
        self.runner
            .run(&compose_down(&self.config.dev_compose_file))?;

        output::warn("\nLocal cleanup complete.");
        Ok(())
    }

    /// Copy the production compose file, ensure swarm mode, deploy the stack
    #[instrument(skip(self))]
    pub fn up_prod(&self) -> Result<()> {
        let target = resolve_remote_target(&self.config.remote)?;
        let compose_file = &self.config.prod_compose_file;
        require_file(compose_file)?;

        output::info(&format!("Deploying to {}...", target.destination()));
        for step in self.deploy_steps(&target) {
            self.runner.run(&step)?;
        }

        info!(stack = %self.config.stack_name, "Stack deployed");
        output::success("\nDeployment successful.");
        Ok(())
    }

    /// Remove the production stack from the swarm
    #[instrument(skip(self))]
    pub fn down_prod(&self) -> Result<()> {
        let target = resolve_remote_target(&self.config.remote)?;

        output::warn("Removing remote stack...");
        let script = format!("docker stack rm {}", self.config.stack_name);
        self.runner
            .run(&target.exec(&script, "Stack removal failed."))?;

        info!(stack = %self.config.stack_name, "Stack removed");
        output::success("\nRemote stack removed.");
        Ok(())
    }

    /// Transfer, swarm check, stack deploy
    fn deploy_steps(&self, target: &RemoteTarget) -> [ShellCommand; 3] {
        let remote_path = self.config.remote_compose_path();
        let deploy_script = format!(
            "docker stack deploy -c {remote_path} {} --with-registry-auth",
            self.config.stack_name
        );

        [
            target.copy_to(
                &self.config.prod_compose_file,
                &remote_path,
                "SCP transfer failed.",
            ),
            target.exec(SWARM_INIT_SCRIPT, "Swarm init check failed."),
            target.exec(&deploy_script, "Stack deploy failed."),
        ]
    }
}

fn compose_up(compose_file: &Path) -> ShellCommand {
    compose(compose_file, "Local up failed.").args(["up", "--build", "-d"])
}

fn compose_down(compose_file: &Path) -> ShellCommand {
    compose(compose_file, "Local down failed.").args(["down", "--volumes"])
}

fn compose(compose_file: &Path, label: &str) -> ShellCommand {
    ShellCommand::new("docker", label)
        .args(["compose", "-f"])
        .arg(compose_file.display().to_string())
}

fn require_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(MsrvError::compose_file_missing(path))
    }
}
