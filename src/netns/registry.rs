//! Read-only view of the host's named network namespaces.
//!
//! iproute2 keeps one bind-mount point per named namespace under
//! `/var/run/netns`; listing that directory is the same snapshot `ip netns
//! list` prints. The networking control plane may create or tear down entries
//! concurrently, so a listing is only ever a snapshot, never a lock.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory where iproute2 registers named network namespaces.
pub const NETNS_DIR: &str = "/var/run/netns";

/// Read-only host namespace registry.
pub trait NetnsRegistry {
    /// Lists the names of all registered namespaces, in directory order.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the registry cannot be read.
    fn list(&self) -> io::Result<Vec<String>>;

    /// Returns true if a namespace with the given name is registered.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the registry cannot be read.
    fn contains(&self, name: &str) -> io::Result<bool> {
        Ok(self.list()?.iter().any(|n| n == name))
    }
}

/// The host's namespace registry at [`NETNS_DIR`].
#[derive(Debug, Clone)]
pub struct HostNetns {
    dir: PathBuf,
}

impl Default for HostNetns {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(NETNS_DIR),
        }
    }
}

impl HostNetns {
    /// Creates a registry over the default directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry over a custom directory.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this registry reads.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl NetnsRegistry for HostNetns {
    fn list(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // No namespace was ever registered on this host: the directory
            // does not exist until iproute2 creates the first entry.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
