//! Relay binary: parse the listen port, install logging, run the
//! accept loop.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Store-and-forward message relay for the Courier protocol.
#[derive(Debug, Parser)]
#[command(name = "courier-relay", version)]
struct Cli {
    /// TCP port to listen on.
    #[arg(value_parser = clap::value_parser!(u16).range(1024..=64000))]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), courier_relay::RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    courier_relay::run(cli.port).await
}
