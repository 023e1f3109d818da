//! Error types for vmreach.
//!
//! Uses thiserror for deriving std::error::Error and miette for rich diagnostics.
//! Resolution failures, launch failures, and input failures are kept in separate
//! enums so operators can tell a topology problem from a permission problem.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the application.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Topology resolution failed before anything was launched.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    /// Entering the namespace or launching the wrapped command failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Launch(#[from] LaunchError),

    /// Bad arguments, detected before any platform query.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),
}

/// Errors raised while walking Instance -> Port -> Network -> Router -> Namespace.
///
/// Every variant names the entity that failed to resolve. All are fatal to the
/// call; nothing is retried.
#[derive(Error, Debug, Diagnostic)]
pub enum ResolveError {
    /// No instance with the given name exists on the platform.
    #[error("instance not found: {name}")]
    #[diagnostic(
        code(vmreach::resolve::instance_not_found),
        help("check the instance name with `openstack server list`")
    )]
    InstanceNotFound { name: String },

    /// The instance has no port with a compute device owner.
    #[error("no compute port attached to instance {instance}")]
    #[diagnostic(
        code(vmreach::resolve::no_compute_port),
        help("the instance may still be building, or its port was detached")
    )]
    NoComputePort { instance: String },

    /// The compute port carries no IPv4 fixed address.
    #[error("port {port} has no fixed IPv4 address")]
    #[diagnostic(code(vmreach::resolve::no_fixed_address))]
    NoFixedAddress { port: String },

    /// No router interface port exists on the instance's network.
    #[error("no router interface on network {network}")]
    #[diagnostic(
        code(vmreach::resolve::no_router_on_network),
        help("the network is not attached to a router, so it has no namespace")
    )]
    NoRouterOnNetwork { network: String },

    /// The derived namespace does not exist on this host.
    #[error("namespace {namespace} not present on this host")]
    #[diagnostic(
        code(vmreach::resolve::namespace_absent),
        help("run this tool on the network node hosting the router")
    )]
    NamespaceAbsent { namespace: String },

    /// A platform query failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    /// The host namespace registry could not be read.
    #[error("failed to read the namespace registry")]
    #[diagnostic(code(vmreach::resolve::registry))]
    Registry {
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the platform query client.
#[derive(Error, Debug, Diagnostic)]
pub enum QueryError {
    /// The platform client binary could not be started.
    #[error("failed to run {command}")]
    #[diagnostic(
        code(vmreach::query::spawn),
        help("is the openstack client installed and on PATH?")
    )]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The platform client exited with a failure status.
    #[error("{command} failed ({status}): {stderr}")]
    #[diagnostic(code(vmreach::query::failed))]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The platform client produced output that could not be deserialized.
    #[error("could not decode the response of {command}")]
    #[diagnostic(code(vmreach::query::decode))]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when entering the namespace or launching the wrapped command.
///
/// Kept apart from [`ResolveError`] so a permission problem is never mistaken
/// for a topology problem.
#[derive(Error, Debug, Diagnostic)]
pub enum LaunchError {
    /// The caller lacks the privilege needed to enter a network namespace.
    #[error("entering a network namespace requires elevated privileges (euid {euid})")]
    #[diagnostic(code(vmreach::launch::privilege), help("re-run with sudo"))]
    PrivilegeRequired { euid: u32 },

    /// The namespace file could not be opened.
    #[error("failed to open namespace {namespace}")]
    #[diagnostic(code(vmreach::launch::namespace_open))]
    NamespaceOpen {
        namespace: String,
        #[source]
        source: std::io::Error,
    },

    /// An empty argv was supplied.
    #[error("command cannot be empty")]
    #[diagnostic(code(vmreach::launch::empty_command))]
    EmptyCommand,

    /// The wrapped command could not be spawned inside the namespace.
    #[error("failed to launch {command} in namespace {namespace}")]
    #[diagnostic(code(vmreach::launch::spawn))]
    Spawn {
        command: String,
        namespace: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in the arguments themselves, detected before any platform query.
#[derive(Error, Debug, Diagnostic)]
pub enum InputError {
    /// The instance name argument is empty.
    #[error("instance name must not be empty")]
    #[diagnostic(code(vmreach::input::empty_instance_name))]
    EmptyInstanceName,

    /// The given key file does not exist or is not readable.
    #[error("key file not found: {path}")]
    #[diagnostic(code(vmreach::input::key_file))]
    KeyFileMissing { path: PathBuf },
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
