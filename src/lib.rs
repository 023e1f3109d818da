//! vmreach - Reach cloud instances on their tenant networks through the
//! router's network namespace.
//!
//! Tenant networks have no route from the host, but the platform's networking
//! agent implements each router as a named network namespace on the network
//! node. This crate resolves an instance name to that namespace and the
//! instance's private address, then runs a command (a remote shell, a
//! reachability probe) inside the namespace with the command's own exit
//! status propagated verbatim.
//!
//! Resolution walks Instance -> Port -> Network -> Router -> Namespace with
//! fresh, uncached platform queries; execution joins the pre-existing
//! namespace via `setns(2)`. Nothing here creates, destroys, or locks any of
//! the resources it looks at.
//!
//! # Example
//!
//! ```no_run
//! use vmreach::netns::{HostNetns, NetnsExecutor};
//! use vmreach::system::ElevatedPrivileges;
//! use vmreach::topology::{ClientConfig, OpenStackCli, Resolver};
//!
//! let client = OpenStackCli::new(ClientConfig::default());
//! let resolver = Resolver::new(client, HostNetns::default());
//! let target = resolver.resolve("demo-vm").unwrap();
//!
//! let privileges = ElevatedPrivileges::acquire().unwrap();
//! let argv = vec![
//!     String::from("ping"),
//!     String::from("-c"),
//!     String::from("3"),
//!     target.address.to_string(),
//! ];
//! let code = NetnsExecutor::new()
//!     .run(&privileges, &target.namespace, &argv)
//!     .unwrap();
//! std::process::exit(code);
//! ```

pub mod error;
pub mod netns;
pub mod system;
pub mod topology;

// Re-export commonly used types
pub use error::{Error, InputError, LaunchError, QueryError, ResolveError, Result};
pub use netns::{NamespaceContext, NetnsExecutor};
pub use topology::{ResolvedTarget, Resolver};
