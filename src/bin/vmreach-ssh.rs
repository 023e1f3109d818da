//! vmreach-ssh - Entry point for the remote-shell front end.
//!
//! Resolves an instance name to its router namespace and private address,
//! then opens ssh to the guest from inside the namespace. Exits with the
//! shell's own status; resolution and launch failures exit 1 with a one-line
//! message on stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, fmt};

use vmreach::error::{Error, InputError};
use vmreach::netns::{HostNetns, NetnsExecutor};
use vmreach::system::ElevatedPrivileges;
use vmreach::topology::{ClientConfig, OpenStackCli, Resolver};

/// Open a remote shell to an instance over its tenant network.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the instance to reach
    instance_name: String,

    /// Guest user to log in as
    guest_user: String,

    /// Private key file passed to `ssh -i`
    key_file: Option<PathBuf>,

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
    // Input checks come before any platform query.
    if args.instance_name.trim().is_empty() {
        return Err(InputError::EmptyInstanceName.into());
    }
    if let Some(key_file) = &args.key_file {
        if !key_file.is_file() {
            return Err(InputError::KeyFileMissing {
                path: key_file.clone(),
            }
            .into());
        }
    }

    let mut config = ClientConfig::default();
    if let Some(cloud) = &args.cloud {
        config = config.with_cloud(cloud);
    }

    let resolver = Resolver::new(OpenStackCli::new(config), HostNetns::default());
    let target = resolver.resolve(&args.instance_name)?;
    debug!(namespace = %target.namespace, address = %target.address, "Resolved target");

    let privileges = ElevatedPrivileges::acquire()?;
    let argv = ssh_argv(
        &args.guest_user,
        &target.address.to_string(),
        args.key_file.as_deref(),
    );

    Ok(NetnsExecutor::new().run(&privileges, &target.namespace, &argv)?)
}

/// Builds the ssh argv.
///
/// Guest addresses are recycled across environment rebuilds, so the host key
/// behind an address changes regularly; pinning is disabled to keep the tool
/// usable as an interactive diagnostic.
fn ssh_argv(user: &str, address: &str, key_file: Option<&Path>) -> Vec<String> {
    let mut argv = vec![
        String::from("ssh"),
        String::from("-o"),
        String::from("StrictHostKeyChecking=no"),
        String::from("-o"),
        String::from("UserKnownHostsFile=/dev/null"),
    ];
    if let Some(key) = key_file {
        argv.push(String::from("-i"));
        argv.push(key.to_string_lossy().into_owned());
    }
    argv.push(format!("{user}@{address}"));
    argv
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
