//! Host network namespaces: naming, registry lookup, and command execution.
//!
//! Namespaces are created and destroyed by the platform's networking agent;
//! this crate only observes the registry and joins existing namespaces.
//!
//! # Example
//!
//! ```no_run
//! use vmreach::netns::{HostNetns, NamespaceContext, NetnsExecutor, NetnsRegistry};
//! use vmreach::system::ElevatedPrivileges;
//!
//! let ns = NamespaceContext::for_router("r1");
//! assert!(HostNetns::default().contains(ns.name()).unwrap());
//!
//! let privileges = ElevatedPrivileges::acquire().unwrap();
//! let code = NetnsExecutor::new()
//!     .run(&privileges, &ns, &[String::from("ip"), String::from("addr")])
//!     .unwrap();
//! assert_eq!(code, 0);
//! ```

mod context;
mod executor;
mod registry;

pub use context::{NAMESPACE_PREFIX, NamespaceContext};
pub use executor::NetnsExecutor;
pub use registry::{HostNetns, NETNS_DIR, NetnsRegistry};
