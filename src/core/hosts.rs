//! Hosts file registration for local development domains
//!
//! The presence check is a plain substring search over the whole file, so a
//! hostname contained in an unrelated line counts as registered. Check and
//! append are separate steps with no lock between them.

use crate::{
    error::{MsrvError, Result},
    utils::{
        output,
        process::{CommandRunner, ShellCommand},
    },
};
use std::{fmt, fs, net::IpAddr, path::PathBuf};
use tracing::{debug, info, instrument};

/// One `ip<TAB>hostname` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsEntry {
    pub ip: IpAddr,
    pub hostname: String,
}

impl fmt::Display for HostsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.ip, self.hostname)
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostsOutcome {
    AlreadyPresent,
    Appended,
}

/// Appends entries to a hosts file through an elevated command
pub struct HostsFileEditor<R> {
    path: PathBuf,
    ip: IpAddr,
    runner: R,
}

impl<R: CommandRunner> HostsFileEditor<R> {
    pub fn new(path: impl Into<PathBuf>, ip: IpAddr, runner: R) -> Self {
        Self {
            path: path.into(),
            ip,
            runner,
        }
    }

    /// Make sure `hostname` resolves to the loopback address.
    #[instrument(skip(self))]
    pub fn register(&self, hostname: &str) -> Result<HostsOutcome> {
        if !self.path.exists() {
            return Err(MsrvError::hosts_file_not_found(&self.path));
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| MsrvError::file_system("read", &self.path, e))?;
        if contents.contains(hostname) {
            output::plain(&format!(
                "Host entry for '{hostname}' already exists. Skipping."
            ));
            debug!("{} already lists {}", self.path.display(), hostname);
            return Ok(HostsOutcome::AlreadyPresent);
        }

        let entry = HostsEntry {
            ip: self.ip,
            hostname: hostname.to_string(),
        };
        output::warn(&format!(
            "Adding '{hostname}' to {}. This may require sudo.",
            self.path.display()
        ));

        self.runner
            .run(&self.append_command(&entry))
            .map_err(|e| MsrvError::hosts_write_failed(&self.path, e))?;

        info!("Appended '{}' to {}", entry, self.path.display());
        output::success(&format!("Successfully added {hostname}."));
        Ok(HostsOutcome::Appended)
    }

    /// Privileged append of one line, the line itself fed through stdin
    #[cfg(not(windows))]
    fn append_command(&self, entry: &HostsEntry) -> ShellCommand {
        ShellCommand::new("sudo", "Failed to update hosts file.")
            .args(["tee", "-a"])
            .arg(self.path.display().to_string())
            .stdin(format!("{entry}\n"))
    }

    /// Appends from the current console, which must already be elevated
    #[cfg(windows)]
    fn append_command(&self, entry: &HostsEntry) -> ShellCommand {
        let path = self.path.display().to_string().replace('\'', "''");
        ShellCommand::new("powershell", "Failed to update hosts file.")
            .args(["-NoProfile", "-Command"])
            .arg(format!(
                "Add-Content -Path '{path}' -Value ([Console]::In.ReadToEnd().TrimEnd())"
            ))
            .stdin(format!("{entry}\n"))
    }
}
