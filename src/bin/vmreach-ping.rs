//! vmreach-ping - Entry point for the reachability-probe front end.
//!
//! Resolves an instance name to its router namespace and private address,
//! then runs a fixed-count ping from inside the namespace. Exits with the
//! probe's own status; resolution and launch failures exit 1 with a one-line
//! message on stderr.

use std::net::Ipv4Addr;
use std::process;

use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, fmt};

use vmreach::error::{Error, InputError};
use vmreach::netns::{HostNetns, NetnsExecutor};
use vmreach::system::ElevatedPrivileges;
use vmreach::topology::{ClientConfig, OpenStackCli, Resolver};

/// Number of echo requests the probe sends.
const PROBE_COUNT: u32 = 3;

/// Probe an instance's private address over its tenant network.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the instance to probe
    instance_name: String,

    /// Cloud to select from the platform client's configuration
    #[arg(long, env = "OS_CLOUD")]
    cloud: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<i32, Error> {
    if args.instance_name.trim().is_empty() {
        return Err(InputError::EmptyInstanceName.into());
    }

    let mut config = ClientConfig::default();
    if let Some(cloud) = &args.cloud {
        config = config.with_cloud(cloud);
    }

    let resolver = Resolver::new(OpenStackCli::new(config), HostNetns::default());
    let target = resolver.resolve(&args.instance_name)?;
    debug!(namespace = %target.namespace, address = %target.address, "Resolved target");

    let privileges = ElevatedPrivileges::acquire()?;
    let argv = probe_argv(target.address);

    Ok(NetnsExecutor::new().run(&privileges, &target.namespace, &argv)?)
}

/// Builds the probe argv; the probe tool's exit status is the verdict.
fn probe_argv(address: Ipv4Addr) -> Vec<String> {
    vec![
        String::from("ping"),
        String::from("-c"),
        PROBE_COUNT.to_string(),
        address.to_string(),
    ]
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_argv_is_fixed_count() {
        let argv = probe_argv("10.10.10.5".parse().expect("addr"));
        assert_eq!(argv, vec!["ping", "-c", "3", "10.10.10.5"]);
    }
}
