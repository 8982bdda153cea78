//! Core functionality
//!
//! Remote target resolution, hosts file registration and the stack
//! lifecycle built on top of them.

pub mod deploy;
pub mod hosts;
pub mod remote;

pub use deploy::Deployer;
pub use hosts::{HostsFileEditor, HostsOutcome};
pub use remote::{RemoteTarget, resolve_remote_target};
