//! Command-line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Microservice (MSRV) Management CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "msrv")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// File with SSH_USER, SSH_HOST and PEM_KEY_PATH, loaded if present
    #[arg(long = "env-file", global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a local development domain (default: msrv.local.com) in the hosts file
    RegisterHosts {
        /// Hostname to map to 127.0.0.1
        hostname: Option<String>,

        /// Hosts file to edit instead of the system default
        #[arg(long = "hosts-file")]
        hosts_file: Option<PathBuf>,
    },

    /// Start services (local Docker Compose or remote Swarm)
    Up {
        /// Deploy to the remote production server via Swarm
        #[arg(long)]
        prod: bool,
    },

    /// Stop services and clean up
    Down {
        /// Remove the remote production stack
        #[arg(long)]
        prod: bool,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = Args::try_parse_from(["msrv", "up"]).unwrap();
        assert!(!args.debug);
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert!(matches!(args.command, Command::Up { prod: false }));
    }

    #[test]
    fn test_parse_debug_flag() {
        let args = Args::try_parse_from(["msrv", "down", "--debug"]).unwrap();
        assert!(args.debug);
    }

    #[test]
    fn test_parse_prod_flags() {
        let args = Args::try_parse_from(["msrv", "up", "--prod"]).unwrap();
        assert!(matches!(args.command, Command::Up { prod: true }));

        let args = Args::try_parse_from(["msrv", "down", "--prod"]).unwrap();
        assert!(matches!(args.command, Command::Down { prod: true }));
    }

    #[test]
    fn test_parse_register_hosts() {
        let args = Args::try_parse_from(["msrv", "register-hosts"]).unwrap();
        match args.command {
            Command::RegisterHosts {
                hostname,
                hosts_file,
            } => {
                assert!(hostname.is_none());
                assert!(hosts_file.is_none());
            }
            _ => panic!("Expected RegisterHosts command"),
        }

        let args = Args::try_parse_from([
            "msrv",
            "register-hosts",
            "api.local.test",
            "--hosts-file",
            "/tmp/hosts",
        ])
        .unwrap();
        match args.command {
            Command::RegisterHosts {
                hostname,
                hosts_file,
            } => {
                assert_eq!(hostname.as_deref(), Some("api.local.test"));
                assert_eq!(hosts_file, Some(PathBuf::from("/tmp/hosts")));
            }
            _ => panic!("Expected RegisterHosts command"),
        }
    }

    #[test]
    fn test_parse_env_file() {
        let args = Args::try_parse_from(["msrv", "--env-file", "deploy.env", "up"]).unwrap();
        assert_eq!(args.env_file, PathBuf::from("deploy.env"));
    }
}
