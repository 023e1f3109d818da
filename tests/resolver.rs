//! Integration tests for topology resolution.
//!
//! These tests drive the resolver against an in-memory platform double that
//! records every query it receives, so short-circuiting is observable: a
//! failed step must leave the later lookups unissued.

use std::cell::RefCell;
use std::io;

use vmreach::error::ResolveError;
use vmreach::netns::NetnsRegistry;
use vmreach::topology::{FixedIp, Instance, Port, PortFilter, Resolver, TopologyClient};

/// In-memory topology with a query log.
#[derive(Default)]
struct FakeTopology {
    instances: Vec<Instance>,
    ports: Vec<Port>,
    queries: RefCell<Vec<String>>,
}

impl FakeTopology {
    fn query_log(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl TopologyClient for &FakeTopology {
    fn find_instance_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Instance>, vmreach::error::QueryError> {
        self.queries.borrow_mut().push(format!("server {name}"));
        Ok(self.instances.iter().find(|i| i.name == name).cloned())
    }

    fn list_ports(&self, filter: &PortFilter) -> Result<Vec<Port>, vmreach::error::QueryError> {
        self.queries.borrow_mut().push(format!(
            "ports device_id={:?} network_id={:?} device_owner={:?}",
            filter.device_id, filter.network_id, filter.device_owner
        ));
        Ok(self
            .ports
            .iter()
            .filter(|p| {
                filter.device_id.as_ref().is_none_or(|d| &p.device_id == d)
                    && filter.network_id.as_ref().is_none_or(|n| &p.network_id == n)
                    && filter
                        .device_owner
                        .as_ref()
                        .is_none_or(|o| &p.device_owner == o)
            })
            .cloned()
            .collect())
    }
}

/// In-memory namespace registry with a lookup counter.
#[derive(Default)]
struct FakeRegistry {
    names: Vec<String>,
    fail: bool,
    lookups: RefCell<usize>,
}

impl FakeRegistry {
    fn with_names(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| String::from(*n)).collect(),
            ..Self::default()
        }
    }

    fn lookup_count(&self) -> usize {
        *self.lookups.borrow()
    }
}

impl NetnsRegistry for &FakeRegistry {
    fn list(&self) -> io::Result<Vec<String>> {
        *self.lookups.borrow_mut() += 1;
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(self.names.clone())
    }
}

fn instance(id: &str, name: &str) -> Instance {
    Instance {
        id: String::from(id),
        name: String::from(name),
    }
}

fn port(id: &str, network_id: &str, device_owner: &str, device_id: &str, ips: &[&str]) -> Port {
    Port {
        id: String::from(id),
        network_id: String::from(network_id),
        device_owner: String::from(device_owner),
        device_id: String::from(device_id),
        fixed_ips: ips
            .iter()
            .map(|a| FixedIp {
                ip_address: a.parse().expect("test address"),
                subnet_id: None,
            })
            .collect(),
    }
}

/// The reference topology: demo-vm on n1, routed by r1, namespace present.
fn demo_topology() -> FakeTopology {
    FakeTopology {
        instances: vec![instance("i1", "demo-vm")],
        ports: vec![
            port("p1", "n1", "compute:nova", "i1", &["10.10.10.5"]),
            port("p2", "n1", "network:router_interface", "r1", &["10.10.10.1"]),
        ],
        queries: RefCell::new(Vec::new()),
    }
}

#[test]
fn test_demo_vm_resolves_end_to_end() {
    let topology = demo_topology();
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let target = resolver.resolve("demo-vm").expect("resolution should succeed");

    assert_eq!(target.namespace.name(), "qrouter-r1");
    assert_eq!(target.address, "10.10.10.5".parse::<std::net::Ipv4Addr>().expect("addr"));
}

#[test]
fn test_resolution_is_deterministic() {
    let topology = demo_topology();
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let first = resolver.resolve("demo-vm").expect("first call");
    let second = resolver.resolve("demo-vm").expect("second call");

    assert_eq!(first, second);
}

#[test]
fn test_unknown_instance_stops_after_one_query() {
    let topology = demo_topology();
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("ghost-vm").expect_err("should fail");

    assert!(matches!(err, ResolveError::InstanceNotFound { name } if name == "ghost-vm"));
    assert_eq!(topology.query_log(), vec!["server ghost-vm"]);
    assert_eq!(registry.lookup_count(), 0);
}

#[test]
fn test_no_compute_port_issues_no_router_lookup() {
    let topology = FakeTopology {
        instances: vec![instance("i1", "demo-vm")],
        // Only a DHCP port hangs off the instance's device id.
        ports: vec![port("p1", "n1", "network:dhcp", "i1", &["10.10.10.2"])],
        queries: RefCell::new(Vec::new()),
    };
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("demo-vm").expect_err("should fail");

    assert!(matches!(err, ResolveError::NoComputePort { instance } if instance == "demo-vm"));
    let log = topology.query_log();
    assert_eq!(log.len(), 2, "server lookup and one port listing only: {log:?}");
    assert!(
        !log.iter().any(|q| q.contains("network_id=Some")),
        "router lookup must not be issued: {log:?}"
    );
    assert_eq!(registry.lookup_count(), 0);
}

#[test]
fn test_no_fixed_address_stops_before_router_lookup() {
    let topology = FakeTopology {
        instances: vec![instance("i1", "demo-vm")],
        ports: vec![
            port("p1", "n1", "compute:nova", "i1", &[]),
            port("p2", "n1", "network:router_interface", "r1", &["10.10.10.1"]),
        ],
        queries: RefCell::new(Vec::new()),
    };
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("demo-vm").expect_err("should fail");

    assert!(matches!(err, ResolveError::NoFixedAddress { port } if port == "p1"));
    assert!(
        !topology
            .query_log()
            .iter()
            .any(|q| q.contains("network_id=Some")),
        "router lookup must not be issued"
    );
    assert_eq!(registry.lookup_count(), 0);
}

#[test]
fn test_orphan_vm_has_no_router_and_skips_namespace_check() {
    let topology = FakeTopology {
        instances: vec![instance("i2", "orphan-vm")],
        ports: vec![port("p3", "n2", "compute:nova", "i2", &["10.20.20.7"])],
        queries: RefCell::new(Vec::new()),
    };
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("orphan-vm").expect_err("should fail");

    assert!(matches!(err, ResolveError::NoRouterOnNetwork { network } if network == "n2"));
    assert_eq!(registry.lookup_count(), 0, "namespace check must never run");
}

#[test]
fn test_namespace_absent_on_host() {
    let topology = demo_topology();
    let registry = FakeRegistry::default();
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("demo-vm").expect_err("should fail");

    assert!(
        matches!(err, ResolveError::NamespaceAbsent { namespace } if namespace == "qrouter-r1")
    );
}

#[test]
fn test_registry_failure_is_not_absence() {
    let topology = demo_topology();
    let registry = FakeRegistry {
        fail: true,
        ..FakeRegistry::default()
    };
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("demo-vm").expect_err("should fail");

    assert!(matches!(err, ResolveError::Registry { .. }));
}

#[test]
fn test_first_compute_port_wins() {
    let topology = FakeTopology {
        instances: vec![instance("i1", "demo-vm")],
        ports: vec![
            port("p1", "n1", "compute:nova", "i1", &["10.10.10.5"]),
            port("p9", "n9", "compute:nova", "i1", &["10.99.99.9"]),
            port("p2", "n1", "network:router_interface", "r1", &["10.10.10.1"]),
        ],
        queries: RefCell::new(Vec::new()),
    };
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let target = resolver.resolve("demo-vm").expect("resolution should succeed");

    assert_eq!(target.address, "10.10.10.5".parse::<std::net::Ipv4Addr>().expect("addr"));
    assert_eq!(target.namespace.name(), "qrouter-r1");
}

#[test]
fn test_exact_name_match_required() {
    // The double matches exactly, like the production adapter after its
    // client-side filtering; a prefix of a real name must not resolve.
    let topology = demo_topology();
    let registry = FakeRegistry::with_names(&["qrouter-r1"]);
    let resolver = Resolver::new(&topology, &registry);

    let err = resolver.resolve("demo").expect_err("should fail");
    assert!(matches!(err, ResolveError::InstanceNotFound { .. }));
}
