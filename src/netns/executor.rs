//! Command execution inside an existing network namespace.
//!
//! The child process joins the namespace itself: after `fork` and before
//! `exec` it calls `setns(2)` on the namespace's registry file with
//! `CLONE_NEWNET`. The parent never leaves the host namespace, and the
//! wrapped command runs with argv unmodified and the caller's stdio.
//!
//! The exit status of the wrapped command is propagated verbatim; nothing is
//! interpreted, retried, or suppressed, and no timeout is imposed. A wrapped
//! command that blocks indefinitely blocks this call.

#![allow(unsafe_code)]
// `pre_exec` is inherently unsafe: the closure runs in the forked child where
// only async-signal-safe operations are allowed. The closure below performs a
// single setns syscall.

use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use nix::sched::{CloneFlags, setns};
use tracing::{debug, instrument};

use super::context::NamespaceContext;
use super::registry::NETNS_DIR;
use crate::error::LaunchError;
use crate::system::ElevatedPrivileges;

/// Launches commands inside pre-existing named network namespaces.
///
/// # Example
///
/// ```no_run
/// use vmreach::netns::{NamespaceContext, NetnsExecutor};
/// use vmreach::system::ElevatedPrivileges;
///
/// let privileges = ElevatedPrivileges::acquire().unwrap();
/// let executor = NetnsExecutor::new();
/// let ns = NamespaceContext::for_router("r1");
///
/// let code = executor
///     .run(&privileges, &ns, &[String::from("ping"), String::from("-c"), String::from("3"), String::from("10.10.10.5")])
///     .unwrap();
/// std::process::exit(code);
/// ```
#[derive(Debug, Clone)]
pub struct NetnsExecutor {
    ns_dir: PathBuf,
}

impl Default for NetnsExecutor {
    fn default() -> Self {
        Self {
            ns_dir: PathBuf::from(NETNS_DIR),
        }
    }
}

impl NetnsExecutor {
    /// Creates an executor over the host's default namespace directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor over a custom namespace directory.
    #[must_use]
    pub fn with_ns_dir(ns_dir: impl Into<PathBuf>) -> Self {
        Self {
            ns_dir: ns_dir.into(),
        }
    }

    /// Runs `argv` inside the namespace and returns its exact exit status.
    ///
    /// Standard input/output/error are inherited from the caller. The
    /// privilege token is required because joining another network namespace
    /// needs `CAP_SYS_ADMIN`; acquiring the token up front keeps a permission
    /// problem distinguishable from a topology problem.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::EmptyCommand`] if `argv` is empty
    /// - [`LaunchError::NamespaceOpen`] if the namespace file cannot be opened
    /// - [`LaunchError::Spawn`] if the command cannot be launched
    #[instrument(skip(self, _privileges, argv), fields(namespace = %ctx.name()))]
    pub fn run(
        &self,
        _privileges: &ElevatedPrivileges,
        ctx: &NamespaceContext,
        argv: &[String],
    ) -> Result<i32, LaunchError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(LaunchError::EmptyCommand);
        };

        let ns_path = self.ns_dir.join(ctx.name());
        let ns_file = File::open(&ns_path).map_err(|e| LaunchError::NamespaceOpen {
            namespace: ctx.name().to_string(),
            source: e,
        })?;

        debug!(command = %program, args = args.len(), "Launching in namespace");

        let mut cmd = Command::new(program);
        cmd.args(args);
        unsafe {
            cmd.pre_exec(move || {
                setns(ns_file.as_fd(), CloneFlags::CLONE_NEWNET).map_err(io::Error::from)
            });
        }

        let status = cmd.status().map_err(|e| LaunchError::Spawn {
            command: program.clone(),
            namespace: ctx.name().to_string(),
            source: e,
        })?;

        let code = exit_code(status);
        debug!(exit_code = code, "Command completed");
        Ok(code)
    }
}

/// Maps an exit status onto a process exit code.
///
/// A signal-terminated child follows the shell convention `128 + signo`.
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}
