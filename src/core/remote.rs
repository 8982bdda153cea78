//! Remote deployment target resolution
//!
//! Turns the raw SSH settings into a validated [`RemoteTarget`] and builds
//! the `scp`/`ssh` invocations that act on it.

use crate::{
    config::RemoteSettings,
    error::{MsrvError, Result},
    utils::process::ShellCommand,
};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Validated SSH destination for production operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub user: String,
    pub host: String,
    /// Absolute path of the private key, when one is configured
    pub identity: Option<PathBuf>,
}

impl RemoteTarget {
    /// `user@host`
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `-i <key>` for ssh and scp, or nothing
    #[must_use]
    pub fn identity_args(&self) -> Vec<String> {
        self.identity
            .as_ref()
            .map(|key| vec!["-i".to_string(), key.display().to_string()])
            .unwrap_or_default()
    }

    /// Copy a local file to `remote_path` on the target
    #[must_use]
    pub fn copy_to(&self, local: &Path, remote_path: &str, label: &str) -> ShellCommand {
        ShellCommand::new("scp", label)
            .args(self.identity_args())
            .arg(local.display().to_string())
            .arg(format!("{}:{}", self.destination(), remote_path))
    }

    /// Run `script` in one remote shell session on the target
    #[must_use]
    pub fn exec(&self, script: &str, label: &str) -> ShellCommand {
        ShellCommand::new("ssh", label)
            .args(self.identity_args())
            .arg(self.destination())
            .arg(script)
            .remote()
    }
}

/// Resolve the remote target from raw settings.
///
/// Fails with [`MsrvError::MissingCredentials`] when user or host is unset,
/// with [`MsrvError::InvalidTarget`] when either would be read as an option
/// by ssh/scp, and with [`MsrvError::KeyNotFound`] when a configured key is
/// not on disk.
#[instrument(skip(settings))]
pub fn resolve_remote_target(settings: &RemoteSettings) -> Result<RemoteTarget> {
    let (Some(user), Some(host)) = (non_empty(&settings.user), non_empty(&settings.host)) else {
        return Err(MsrvError::MissingCredentials);
    };
    for value in [user, host] {
        if value.starts_with('-') {
            return Err(MsrvError::invalid_target(value));
        }
    }

    let identity = match settings.key_path.as_deref().filter(|p| !p.is_empty()) {
        Some(raw) => {
            let path = expand_tilde(raw);
            if !path.exists() {
                return Err(MsrvError::key_not_found(path));
            }
            debug!("Using identity file {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(RemoteTarget {
        user: user.to_string(),
        host: host.to_string(),
        identity,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Expand a leading `~` or `~/` to the current user's home directory.
/// Paths without one, or with no known home directory, are returned as-is.
///
/// Only the current user's home is expanded: `~other/...` is left as typed
/// and then fails the existence check.
pub fn expand_tilde(raw: &OsStr) -> PathBuf {
    let Some(raw) = raw.to_str() else {
        return PathBuf::from(raw);
    };
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::NamedTempFile;

    fn settings(user: &str, host: &str, key: Option<&str>) -> RemoteSettings {
        RemoteSettings {
            user: Some(user.to_string()),
            host: Some(host.to_string()),
            key_path: key.map(OsString::from),
        }
    }

    #[test]
    fn test_missing_user_or_host() {
        let err = resolve_remote_target(&RemoteSettings::default()).unwrap_err();
        assert!(matches!(err, MsrvError::MissingCredentials));

        let err = resolve_remote_target(&settings("deploy", "", None)).unwrap_err();
        assert!(matches!(err, MsrvError::MissingCredentials));

        let err = resolve_remote_target(&settings("", "example.com", None)).unwrap_err();
        assert!(matches!(err, MsrvError::MissingCredentials));
    }

    #[test]
    fn test_resolve_without_key() {
        let target = resolve_remote_target(&settings("deploy", "example.com", None)).unwrap();
        assert_eq!(target.destination(), "deploy@example.com");
        assert!(target.identity.is_none());
        assert!(target.identity_args().is_empty());
    }

    #[test]
    fn test_resolve_with_existing_key() {
        let key = NamedTempFile::new().unwrap();
        let key_path = key.path().display().to_string();

        let target =
            resolve_remote_target(&settings("deploy", "example.com", Some(&key_path))).unwrap();
        assert_eq!(target.identity.as_deref(), Some(key.path()));
        assert_eq!(target.identity_args(), vec!["-i".to_string(), key_path]);
    }

    #[test]
    fn test_missing_key_file() {
        let err = resolve_remote_target(&settings(
            "deploy",
            "example.com",
            Some("/nonexistent/msrv/key.pem"),
        ))
        .unwrap_err();

        match err {
            MsrvError::KeyNotFound { path } => {
                assert_eq!(path, PathBuf::from("/nonexistent/msrv/key.pem"));
            }
            other => panic!("Expected KeyNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_tilde() {
        let expand = |raw: &str| expand_tilde(OsStr::new(raw));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand("~"), home);
            assert_eq!(expand("~/.ssh/key.pem"), home.join(".ssh/key.pem"));
        }
        assert_eq!(expand("/abs/key.pem"), PathBuf::from("/abs/key.pem"));
        assert_eq!(expand("~other/key"), PathBuf::from("~other/key"));
    }

    #[test]
    fn test_option_like_user_or_host_is_rejected() {
        let err = resolve_remote_target(&settings("-oProxyCommand=touch /tmp/x", "h", None))
            .unwrap_err();
        match err {
            MsrvError::InvalidTarget { value } => {
                assert_eq!(value, "-oProxyCommand=touch /tmp/x");
            }
            other => panic!("Expected InvalidTarget, got {other:?}"),
        }

        let err = resolve_remote_target(&settings("deploy", "-F/tmp/cfg", None)).unwrap_err();
        assert!(matches!(err, MsrvError::InvalidTarget { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_whitespace_key_path_is_not_ignored() {
        let err = resolve_remote_target(&settings("deploy", "example.com", Some("  ")))
            .unwrap_err();
        assert!(matches!(err, MsrvError::KeyNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_key_path_reports_key_not_found() {
        use std::os::unix::ffi::OsStringExt;

        let mut input = settings("deploy", "example.com", None);
        input.key_path = Some(OsString::from_vec(b"/nonexistent/\xffkey.pem".to_vec()));

        let err = resolve_remote_target(&input).unwrap_err();
        assert!(matches!(err, MsrvError::KeyNotFound { .. }));
    }

    #[test]
    fn test_copy_and_exec_commands() {
        let target = RemoteTarget {
            user: "deploy".to_string(),
            host: "example.com".to_string(),
            identity: Some(PathBuf::from("/keys/prod.pem")),
        };

        let copy = target.copy_to(
            Path::new("docker-compose.prod.yml"),
            "/tmp/docker-compose.prod.yml",
            "SCP transfer failed.",
        );
        assert_eq!(
            copy.to_string(),
            "scp -i /keys/prod.pem docker-compose.prod.yml deploy@example.com:/tmp/docker-compose.prod.yml"
        );
        assert!(!copy.is_remote());

        let exec = target.exec("docker stack rm msrv_app", "Stack removal failed.");
        assert_eq!(
            exec.args,
            vec![
                "-i",
                "/keys/prod.pem",
                "deploy@example.com",
                "docker stack rm msrv_app"
            ]
        );
        assert!(exec.is_remote());
    }
}
