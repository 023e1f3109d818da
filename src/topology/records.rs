//! Typed views of the platform's topology records.
//!
//! Field names (`id`, `network_id`, `device_owner`, `device_id`, `fixed_ips`,
//! `ip_address`) are the platform's wire contract, not a choice of this crate.
//! All records are read-only snapshots deserialized from structured query
//! output; nothing here is ever scraped out of free-form text.

use std::net::{IpAddr, Ipv4Addr};

use serde::Deserialize;

/// Device owner prefix marking a port attached to a compute instance.
///
/// The platform suffixes the scheduling zone (e.g. `compute:nova`), so only
/// the prefix is significant.
pub const COMPUTE_OWNER_PREFIX: &str = "compute:";

/// Device owner marking a port attached to a router.
pub const ROUTER_INTERFACE_OWNER: &str = "network:router_interface";

/// A virtual compute instance, identified by user-supplied name.
///
/// The platform's listing output capitalizes the keys; the aliases map both
/// spellings onto the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instance {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(alias = "Name")]
    pub name: String,
}

/// One fixed address entry on a port.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixedIp {
    /// The assigned address. IPv4 and IPv6 entries share this sequence.
    pub ip_address: IpAddr,
    /// Subnet the address was allocated from.
    #[serde(default)]
    pub subnet_id: Option<String>,
}

/// A virtual network attachment point.
///
/// `device_owner` discriminates the role: a `compute:*` owner marks an
/// instance attachment, [`ROUTER_INTERFACE_OWNER`] marks a router attachment
/// whose `device_id` is the router id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Port {
    pub id: String,
    pub network_id: String,
    #[serde(default)]
    pub device_owner: String,
    #[serde(default)]
    pub device_id: String,
    /// Ordered as returned by the platform; the head entry is authoritative.
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
}

impl Port {
    /// Returns true if this port is attached to a compute instance.
    #[must_use]
    pub fn is_compute(&self) -> bool {
        self.device_owner.starts_with(COMPUTE_OWNER_PREFIX)
    }

    /// Returns true if this port is a router interface.
    #[must_use]
    pub fn is_router_interface(&self) -> bool {
        self.device_owner == ROUTER_INTERFACE_OWNER
    }

    /// All IPv4 fixed addresses on this port, in platform order.
    #[must_use]
    pub fn ipv4_addresses(&self) -> Vec<Ipv4Addr> {
        self.fixed_ips
            .iter()
            .filter_map(|fip| match fip.ip_address {
                IpAddr::V4(addr) => Some(addr),
                IpAddr::V6(_) => None,
            })
            .collect()
    }
}

/// Filter for port listings. Unset fields are not constrained.
///
/// # Example
///
/// ```
/// use vmreach::topology::PortFilter;
///
/// let filter = PortFilter::new()
///     .with_network_id("n1")
///     .with_device_owner("network:router_interface");
/// assert!(filter.device_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortFilter {
    /// Restrict to ports owned by this device (instance or router) id.
    pub device_id: Option<String>,
    /// Restrict to ports on this network.
    pub network_id: Option<String>,
    /// Restrict to ports with exactly this device owner.
    pub device_owner: Option<String>,
}

impl PortFilter {
    /// Creates an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to ports owned by the given device.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Restricts the filter to ports on the given network.
    #[must_use]
    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    /// Restricts the filter to ports with exactly the given device owner.
    #[must_use]
    pub fn with_device_owner(mut self, device_owner: impl Into<String>) -> Self {
        self.device_owner = Some(device_owner.into());
        self
    }
}
