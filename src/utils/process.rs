//! Process execution utilities
//!
//! Commands are argument vectors handed straight to the OS, never a shell
//! string. Output is streamed to the terminal, not captured.

use crate::{
    error::{MsrvError, Result},
    utils::output,
};
use std::{
    fmt,
    io::{self, Write},
    process::{Command, ExitStatus, Stdio},
};
use tracing::{debug, instrument};

/// Where a command ultimately takes effect. Only changes how it is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecLocation {
    Local,
    Remote,
}

/// One external invocation together with the label reported if it fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Program to execute, resolved through PATH
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Human-readable failure label
    pub label: String,
    /// Local or remote execution tag
    pub location: ExecLocation,
    /// Bytes written to the child's stdin, if any
    pub stdin: Option<String>,
}

impl ShellCommand {
    /// Create a local command
    pub fn new(program: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            label: label.into(),
            location: ExecLocation::Local,
            stdin: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Tag the command as executing on a remote host
    #[must_use]
    pub const fn remote(mut self) -> Self {
        self.location = ExecLocation::Remote;
        self
    }

    /// Feed `input` to the child's stdin
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.location, ExecLocation::Remote)
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Single-quote an argument for display when it would not read as one word.
fn quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg.chars().any(|c| {
            c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\' | ';' | '&' | '|')
        });
    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Executes commands one at a time, stopping the caller at the first failure
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`MsrvError::ExternalCommandFailed`] carrying the command's
    /// label and exit code when it does not exit successfully.
    fn run(&self, command: &ShellCommand) -> Result<()>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ShellCommand) -> Result<()> {
        (**self).run(command)
    }
}

/// Runs commands as real child processes with inherited stdout/stderr
#[derive(Debug)]
pub struct ProcessRunner {
    debug: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn spawn_failure(command: &ShellCommand, err: &io::Error) -> MsrvError {
        debug!("Failed to spawn {}: {}", command.program, err);
        // Same codes a POSIX shell reports for missing or unusable programs.
        let exit_code = if err.kind() == io::ErrorKind::NotFound {
            127
        } else {
            126
        };
        MsrvError::external_command(&command.label, command.to_string(), exit_code)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip(self, command), fields(program = %command.program))]
    fn run(&self, command: &ShellCommand) -> Result<()> {
        let cmd_str = command.to_string();
        let tag = if command.is_remote() {
            "REMOTE EXEC"
        } else {
            "LOCAL EXEC"
        };
        output::exec(tag, &cmd_str);
        if self.debug {
            debug!(args = ?command.args, "Running command");
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if command.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_failure(command, &e))?;

        if let Some(input) = &command.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // A child that exits without reading stdin surfaces through its status.
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    debug!("Failed to write stdin: {}", e);
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| Self::spawn_failure(command, &e))?;

        if !status.success() {
            let exit_code = exit_code_of(status);
            debug!("Command failed with exit code: {}", exit_code);
            return Err(MsrvError::external_command(
                &command.label,
                cmd_str,
                exit_code,
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }
}

/// Map an unsuccessful status to the code a shell would report.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.debug);

        let runner = ProcessRunner::default();
        assert!(!runner.debug);
    }

    #[test]
    fn test_display_plain_arguments() {
        let cmd = ShellCommand::new("docker", "Local up failed.")
            .args(["compose", "-f", "docker-compose.yml", "up", "--build", "-d"]);
        assert_eq!(
            cmd.to_string(),
            "docker compose -f docker-compose.yml up --build -d"
        );
        assert!(!cmd.is_remote());
    }

    #[test]
    fn test_display_quotes_scripts() {
        let cmd = ShellCommand::new("ssh", "Stack removal failed.")
            .args(["deploy@example.com", "docker stack rm msrv_app"])
            .remote();
        assert_eq!(
            cmd.to_string(),
            "ssh deploy@example.com 'docker stack rm msrv_app'"
        );
        assert!(cmd.is_remote());

        let cmd = ShellCommand::new("echo", "x").arg("it's");
        assert_eq!(cmd.to_string(), r"echo 'it'\''s'");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_simple_command() {
        let runner = ProcessRunner::new(false);
        let cmd = ShellCommand::new("true", "true failed.");
        assert!(runner.run(&cmd).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failing_command_reports_label_and_code() {
        let runner = ProcessRunner::new(false);
        let cmd = ShellCommand::new("sh", "Script failed.").args(["-c", "exit 3"]);

        match runner.run(&cmd) {
            Err(MsrvError::ExternalCommandFailed {
                label, exit_code, ..
            }) => {
                assert_eq!(label, "Script failed.");
                assert_eq!(exit_code, 3);
            }
            other => panic!("Expected ExternalCommandFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_stdin() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        let runner = ProcessRunner::new(false);
        let cmd = ShellCommand::new("sh", "Write failed.")
            .arg("-c")
            .arg(format!("cat >> {}", target.display()))
            .stdin("127.0.0.1\tmsrv.local.com\n");

        runner.run(&cmd).unwrap();
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "127.0.0.1\tmsrv.local.com\n"
        );
    }

    #[test]
    fn test_missing_program_maps_to_127() {
        let runner = ProcessRunner::new(false);
        let cmd = ShellCommand::new("nonexistent_command_12345", "Missing tool.");
        let err = runner.run(&cmd).unwrap_err();
        assert_eq!(err.exit_code(), 127);
        assert!(err.to_string().contains("Missing tool."));
    }
}
