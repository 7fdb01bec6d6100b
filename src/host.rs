//! Facts about the machine and process running the generator.

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub working_dir: PathBuf,
    pub machine_name: String,
    pub timestamp: DateTime<Utc>,
}

impl HostEnvironment {
    pub fn detect() -> Result<Self> {
        let working_dir = env::current_dir().context("Failed to determine working directory")?;
        Ok(Self {
            working_dir,
            machine_name: machine_name(),
            timestamp: Utc::now(),
        })
    }
}

/// Hostname of this machine, `"localhost"` when it cannot be determined.
pub fn machine_name() -> String {
    system_hostname()
        .or_else(|| env::var("COMPUTERNAME").ok())
        .or_else(|| env::var("HOSTNAME").ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    None
}
