//! Configuration management for msrv
//!
//! Every fixed path and name the commands use lives here, built once at
//! startup and passed down explicitly.

use crate::{
    cli::{Args, Command},
    error::{MsrvError, Result},
};
use std::{
    collections::HashMap,
    env,
    ffi::OsString,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Environment variable holding the remote SSH user
pub const SSH_USER_VAR: &str = "SSH_USER";
/// Environment variable holding the remote SSH host
pub const SSH_HOST_VAR: &str = "SSH_HOST";
/// Environment variable holding the optional private key path
pub const PEM_KEY_PATH_VAR: &str = "PEM_KEY_PATH";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Compose definition for local development
    pub dev_compose_file: PathBuf,
    /// Compose definition deployed to the swarm
    pub prod_compose_file: PathBuf,
    /// Remote directory the production compose file is copied into
    pub remote_dir: String,
    /// Swarm stack name
    pub stack_name: String,
    /// Local development domain
    pub local_domain: String,
    /// System hosts file
    pub hosts_file: PathBuf,
    /// Address local domains resolve to
    pub loopback_ip: IpAddr,
    /// Remote deployment credentials as read from the environment
    pub remote: RemoteSettings,
}

/// Raw remote credentials, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSettings {
    pub user: Option<String>,
    pub host: Option<String>,
    /// Kept as an OS string so a non-UTF-8 path still reaches the key check
    pub key_path: Option<OsString>,
}

impl RemoteSettings {
    /// Capture settings from the process environment, falling back to
    /// values read from the env file
    #[must_use]
    pub fn from_env(file_vars: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| {
            env::var_os(key).or_else(|| file_vars.get(key).map(OsString::from))
        })
    }

    /// Capture settings through an arbitrary lookup.
    ///
    /// Only empty values count as unset. A user or host that is not valid
    /// UTF-8 is treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            user: get(SSH_USER_VAR).and_then(|v| v.into_string().ok()),
            host: get(SSH_HOST_VAR).and_then(|v| v.into_string().ok()),
            key_path: get(PEM_KEY_PATH_VAR),
        }
    }
}

/// Conventional hosts file location for the current platform
#[must_use]
pub fn default_hosts_file() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            dev_compose_file: PathBuf::from("docker-compose.yml"),
            prod_compose_file: PathBuf::from("docker-compose.prod.yml"),
            remote_dir: "/tmp".to_string(),
            stack_name: "msrv_app".to_string(),
            local_domain: "msrv.local.com".to_string(),
            hosts_file: default_hosts_file(),
            loopback_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            remote: RemoteSettings::default(),
        }
    }
}

impl Config {
    /// Create configuration from command line arguments.
    ///
    /// Reads the env file first so its values are visible to the remote
    /// settings lookup.
    pub fn from_args(args: &Args) -> Result<Self> {
        let file_vars = load_env_file(&args.env_file)?;

        let mut config = Self {
            debug: args.debug,
            remote: RemoteSettings::from_env(&file_vars),
            ..Self::default()
        };

        if let Command::RegisterHosts {
            hosts_file: Some(hosts_file),
            ..
        } = &args.command
        {
            config.hosts_file = hosts_file.clone();
        }

        Ok(config)
    }

    /// Remote path the production compose file is copied to
    #[must_use]
    pub fn remote_compose_path(&self) -> String {
        let name = self
            .prod_compose_file
            .file_name()
            .map_or_else(
                || "docker-compose.yml".to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
        format!("{}/{}", self.remote_dir.trim_end_matches('/'), name)
    }

    /// URL the local stack is reachable at once the domain is registered
    #[must_use]
    pub fn local_url(&self) -> String {
        format!("http://{}", self.local_domain)
    }
}

/// Read `KEY=VALUE` pairs from `path` if the file exists.
///
/// Lines that do not parse are skipped with a warning. Process environment
/// variables take precedence over the returned values.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.is_file() {
        debug!("No env file at {}", path.display());
        return Ok(vars);
    }

    let entries = dotenvy::from_path_iter(path).map_err(|e| {
        MsrvError::config(format!("failed to load {}: {e}", path.display()))
    })?;
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(e) => warn!("Skipping entry in {}: {}", path.display(), e),
        }
    }

    debug!("Loaded {} variable(s) from {}", vars.len(), path.display());
    Ok(vars)
}
