//! Query client for the orchestration platform.
//!
//! The [`TopologyClient`] trait is the blocking request/response interface the
//! resolver consumes. The production implementation, [`OpenStackCli`], invokes
//! the platform's command-line client with JSON output and deserializes the
//! responses into the typed records in [`crate::topology::records`].
//!
//! Credentials and environment selection are the caller's concern: the adapter
//! only forwards an optional cloud name, everything else comes from the
//! standard `OS_*` environment the platform client already honors.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::records::{Instance, Port, PortFilter};
use crate::error::QueryError;

/// Configuration for the platform client adapter.
///
/// # Example
///
/// ```
/// use vmreach::topology::ClientConfig;
///
/// let config = ClientConfig::default().with_cloud("devstack");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform client binary. Defaults to `openstack` on PATH.
    pub binary: PathBuf,
    /// Cloud name forwarded as `--os-cloud`, if set.
    pub cloud: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("openstack"),
            cloud: None,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the platform client binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets the cloud name to select from the client's configuration.
    #[must_use]
    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }
}

/// Blocking read interface to the orchestration platform.
///
/// Every call is a fresh query; implementations must not cache. Result order
/// is whatever the platform returns, and callers treat the head element as
/// authoritative.
pub trait TopologyClient {
    /// Looks up an instance by its exact name. `Ok(None)` means zero matches.
    fn find_instance_by_name(&self, name: &str) -> Result<Option<Instance>, QueryError>;

    /// Lists full port records matching the filter, in platform order.
    fn list_ports(&self, filter: &PortFilter) -> Result<Vec<Port>, QueryError>;
}

/// Row shape of the client's port listing; only the id column is stable
/// enough to consume, the full record is fetched per port afterwards.
#[derive(Debug, Deserialize)]
struct PortRow {
    #[serde(alias = "ID")]
    id: String,
}

/// Production [`TopologyClient`] backed by the `openstack` command-line client.
#[derive(Debug, Clone)]
pub struct OpenStackCli {
    config: ClientConfig,
}

impl OpenStackCli {
    /// Creates a client with the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Runs one client subcommand with `-f json` and deserializes stdout.
    fn invoke<T, I, S>(&self, args: I) -> Result<T, QueryError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.config.binary);
        if let Some(cloud) = &self.config.cloud {
            cmd.arg("--os-cloud").arg(cloud);
        }
        cmd.args(args);
        cmd.args(["-f", "json"]);
        cmd.stdin(Stdio::null());

        let rendered = render_command(&cmd);
        trace!(command = %rendered, "Querying platform");

        let output = cmd.output().map_err(|e| QueryError::Spawn {
            command: rendered.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(QueryError::Failed {
                command: rendered,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| QueryError::Decode {
            command: rendered,
            source: e,
        })
    }
}

impl TopologyClient for OpenStackCli {
    fn find_instance_by_name(&self, name: &str) -> Result<Option<Instance>, QueryError> {
        // `server list --name` matches a regular expression on the platform
        // side; require an exact name match on the result.
        let candidates: Vec<Instance> = self.invoke(["server", "list", "--name", name])?;
        Ok(candidates.into_iter().find(|i| i.name == name))
    }

    fn list_ports(&self, filter: &PortFilter) -> Result<Vec<Port>, QueryError> {
        let mut args: Vec<String> = vec![String::from("port"), String::from("list")];
        if let Some(device_id) = &filter.device_id {
            args.push(String::from("--device-id"));
            args.push(device_id.clone());
        }
        if let Some(network_id) = &filter.network_id {
            args.push(String::from("--network"));
            args.push(network_id.clone());
        }
        if let Some(device_owner) = &filter.device_owner {
            args.push(String::from("--device-owner"));
            args.push(device_owner.clone());
        }

        // The listing's columns are display-oriented and omit network_id and
        // device_id, so fetch the full record per port, preserving list order.
        let rows: Vec<PortRow> = self.invoke(&args)?;
        let mut ports = Vec::with_capacity(rows.len());
        for row in rows {
            ports.push(self.invoke(["port", "show", row.id.as_str()])?);
        }
        Ok(ports)
    }
}

/// Renders a command line for diagnostics and error messages.
fn render_command(cmd: &Command) -> String {
    let mut rendered = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
