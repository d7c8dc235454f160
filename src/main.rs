//! Standalone entry point: runs the binary monitor server against the
//! in-memory demo emulator, for manual protocol testing against a real
//! client.

use anyhow::{Context, Result};
use clap::Parser;

use retromon::cli::{normalize_legacy_args, Cli};
use retromon::config::{MonitorConfig, ServerAddress};
use retromon::reference::DemoEmulator;
use retromon::Server;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = normalize_legacy_args(std::env::args());
    let cli = Cli::parse_from(args);

    let mut config = MonitorConfig::load();
    if cli.enable {
        config.enabled = true;
    }
    if cli.disable {
        config.enabled = false;
    }
    if cli.address != retromon::config::DEFAULT_ADDRESS {
        config.address = cli.address.clone();
    }
    config.save().context("failed to persist monitor configuration")?;

    if !config.enabled {
        println!("binary monitor is disabled (pass --enable to start it anyway)");
        return Ok(());
    }

    let address = ServerAddress::parse(&config.address)
        .with_context(|| format!("invalid monitor address '{}'", config.address))?;
    println!("binary monitor listening on {}", address.to_socket_addr());

    let server = Server::new(address);
    let mut emulator = DemoEmulator::new();
    server.run(&mut emulator)
}
