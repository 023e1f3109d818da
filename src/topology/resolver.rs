//! Resolution of an instance name to its namespace and private address.
//!
//! The walk is Instance -> Port -> Network -> Router -> Namespace, each step
//! strictly sequential and short-circuiting on failure. Results thread through
//! explicit immutable records from stage to stage; there is no shared mutable
//! state and no caching, so repeated calls against an unchanged topology are
//! deterministic.
//!
//! # Head-element policy
//!
//! Wherever the platform may return several candidates (compute ports, fixed
//! addresses, router interfaces) the first element wins. This mirrors the
//! one-port / one-address / one-router shape of the deployments this tool is
//! for; when the assumption is violated the pick is logged at warn level and
//! resolution continues with the head element.

use std::net::Ipv4Addr;

use tracing::{debug, instrument, warn};

use super::client::TopologyClient;
use super::records::{Instance, Port, PortFilter, ROUTER_INTERFACE_OWNER};
use crate::error::ResolveError;
use crate::netns::{NamespaceContext, NetnsRegistry};

/// A fully resolved execution target: the namespace to enter and the
/// instance's private address reachable from inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Host namespace implementing the router attached to the instance's network.
    pub namespace: NamespaceContext,
    /// First IPv4 fixed address of the instance's compute port.
    pub address: Ipv4Addr,
}

/// Walks the platform topology and verifies the namespace on the host.
///
/// # Example
///
/// ```no_run
/// use vmreach::netns::HostNetns;
/// use vmreach::topology::{ClientConfig, OpenStackCli, Resolver};
///
/// let client = OpenStackCli::new(ClientConfig::default());
/// let resolver = Resolver::new(client, HostNetns::default());
/// let target = resolver.resolve("demo-vm").unwrap();
/// println!("{} via {}", target.address, target.namespace);
/// ```
#[derive(Debug)]
pub struct Resolver<C, R> {
    client: C,
    registry: R,
}

impl<C, R> Resolver<C, R>
where
    C: TopologyClient,
    R: NetnsRegistry,
{
    /// Creates a resolver over the given query client and namespace registry.
    #[must_use]
    pub fn new(client: C, registry: R) -> Self {
        Self { client, registry }
    }

    /// Resolves an instance name to its namespace and private address.
    ///
    /// Purely read operations: platform queries plus one read-only host query
    /// (the namespace registry). Every failure aborts immediately; later
    /// lookups are never issued after an earlier step failed.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] kind of the first failing step, naming
    /// the entity that failed to resolve.
    #[instrument(skip(self))]
    pub fn resolve(&self, instance_name: &str) -> Result<ResolvedTarget, ResolveError> {
        let instance = self.instance_by_name(instance_name)?;
        debug!(instance_id = %instance.id, "Resolved instance");

        let port = self.compute_port(&instance)?;
        debug!(port_id = %port.id, network_id = %port.network_id, "Selected compute port");

        let address = first_ipv4(&port)?;
        debug!(%address, "Selected fixed address");

        let uplink = self.router_interface(&port.network_id)?;
        let namespace = NamespaceContext::for_router(&uplink.device_id);
        debug!(router_id = %uplink.device_id, namespace = %namespace, "Derived namespace");

        let present = self
            .registry
            .contains(namespace.name())
            .map_err(|source| ResolveError::Registry { source })?;
        if !present {
            return Err(ResolveError::NamespaceAbsent {
                namespace: namespace.name().to_string(),
            });
        }

        Ok(ResolvedTarget { namespace, address })
    }

    /// Step 1: look up the instance by name.
    fn instance_by_name(&self, name: &str) -> Result<Instance, ResolveError> {
        self.client
            .find_instance_by_name(name)?
            .ok_or_else(|| ResolveError::InstanceNotFound {
                name: name.to_string(),
            })
    }

    /// Step 2: list the instance's ports and keep the first compute attachment.
    fn compute_port(&self, instance: &Instance) -> Result<Port, ResolveError> {
        let filter = PortFilter::new().with_device_id(instance.id.clone());
        let ports: Vec<Port> = self
            .client
            .list_ports(&filter)?
            .into_iter()
            .filter(Port::is_compute)
            .collect();

        take_first(ports, "compute port", &instance.name).ok_or_else(|| {
            ResolveError::NoComputePort {
                instance: instance.name.clone(),
            }
        })
    }

    /// Step 5: list router interfaces on the network and keep the first.
    fn router_interface(&self, network_id: &str) -> Result<Port, ResolveError> {
        let filter = PortFilter::new()
            .with_network_id(network_id)
            .with_device_owner(ROUTER_INTERFACE_OWNER);
        let ports = self.client.list_ports(&filter)?;

        take_first(ports, "router interface", network_id).ok_or_else(|| {
            ResolveError::NoRouterOnNetwork {
                network: network_id.to_string(),
            }
        })
    }
}

/// Step 3: the port's first IPv4 fixed address.
///
/// IPv6 entries are skipped; a port carrying only IPv6 addresses counts as
/// having no fixed address.
fn first_ipv4(port: &Port) -> Result<Ipv4Addr, ResolveError> {
    let addresses = port.ipv4_addresses();
    if addresses.len() > 1 {
        warn!(
            port_id = %port.id,
            candidates = addresses.len(),
            "Port has several IPv4 addresses, using the first"
        );
    }
    addresses
        .first()
        .copied()
        .ok_or_else(|| ResolveError::NoFixedAddress {
            port: port.id.clone(),
        })
}

/// Head-element pick with a warn-level diagnostic when the choice was plural.
fn take_first(ports: Vec<Port>, what: &str, scope: &str) -> Option<Port> {
    if ports.len() > 1 {
        warn!(
            candidates = ports.len(),
            kind = what,
            scope = scope,
            "Several candidates, using the first"
        );
    }
    ports.into_iter().next()
}
