//! Platform topology: typed records, the query client, and the resolver.
//!
//! Resolution maps an instance name to the network namespace through which
//! its private address is reachable:
//!
//! ```text
//! Instance -> compute Port -> Network -> router-interface Port -> Namespace
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vmreach::netns::HostNetns;
//! use vmreach::topology::{ClientConfig, OpenStackCli, Resolver};
//!
//! let client = OpenStackCli::new(ClientConfig::default().with_cloud("devstack"));
//! let resolver = Resolver::new(client, HostNetns::default());
//!
//! let target = resolver.resolve("demo-vm").unwrap();
//! println!("reach {} inside {}", target.address, target.namespace);
//! ```

mod client;
mod records;
mod resolver;

pub use client::{ClientConfig, OpenStackCli, TopologyClient};
pub use records::{COMPUTE_OWNER_PREFIX, FixedIp, Instance, Port, PortFilter, ROUTER_INTERFACE_OWNER};
pub use resolver::{ResolvedTarget, Resolver};
