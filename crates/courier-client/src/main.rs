//! Client binary.
//!
//! `courier-client <host> <port> <name> <operation>` — the operation is
//! one of `read`, `create`, `register`, `keys`. Recipient names,
//! message text, and lookup targets are prompted interactively, with
//! re-prompt on out-of-range input.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use courier_client::{render, request, transport, ClientError, FileKeystore, Keypair, PeerKey};
use courier_proto::limits::{MAX_NAME_LEN, MAX_PAYLOAD_LEN};
use courier_proto::Response;
use tracing_subscriber::EnvFilter;

/// Command-line client for the Courier message relay.
#[derive(Debug, Parser)]
#[command(name = "courier-client", version)]
struct Cli {
    /// Relay host name or address.
    host: String,

    /// Relay TCP port.
    #[arg(value_parser = clap::value_parser!(u16).range(1024..=64000))]
    port: u16,

    /// Name to act as. Unauthenticated; pick responsibly.
    name: String,

    /// Operation to perform.
    #[arg(value_enum)]
    operation: Operation,

    /// Key file holding the own keypair and fetched peer keys.
    #[arg(long, default_value = "courier-keys.cbor")]
    keystore: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Operation {
    /// Drain and display the mailbox.
    Read,
    /// Send a message to another client.
    Create,
    /// Publish this client's public key.
    Register,
    /// Fetch and store a peer's public keys.
    Keys,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("ERROR - {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let store = FileKeystore::new(&cli.keystore);
    match cli.operation {
        Operation::Read => read(&cli, &store).await,
        Operation::Create => create(&cli, &store).await,
        Operation::Register => register(&cli, &store).await,
        Operation::Keys => keys(&cli, &store).await,
    }
}

async fn read(cli: &Cli, store: &FileKeystore) -> Result<(), ClientError> {
    let request = request::read(&cli.name)?;
    let reply = require_reply(transport::exchange(&cli.host, cli.port, &request).await?)?;
    match Response::decode(&reply)? {
        Response::Mailbox { items, has_more } => {
            let keypair = store.load()?.own_keypair()?;
            print!("{}", render::mailbox(&items, has_more, keypair.as_ref()));
            Ok(())
        }
        Response::Keys { .. } => Err(ClientError::UnexpectedResponse),
    }
}

async fn create(cli: &Cli, store: &FileKeystore) -> Result<(), ClientError> {
    let recipient = prompt("Enter Receiver Name", MAX_NAME_LEN)?;
    let message = prompt("Enter Message", MAX_PAYLOAD_LEN)?;

    let keystore = store.load()?;
    let peer_key = keystore.newest_peer_key(&recipient);
    let request = request::create(&cli.name, &recipient, &message, peer_key)?;
    transport::exchange(&cli.host, cli.port, &request).await?;
    println!("Message for {recipient} created");
    Ok(())
}

async fn register(cli: &Cli, store: &FileKeystore) -> Result<(), ClientError> {
    let mut keystore = store.load()?;
    let keypair = match keystore.own_keypair()? {
        Some(keypair) => keypair,
        None => {
            println!("Generating keypair, this can take a moment...");
            let keypair = Keypair::generate()?;
            keystore.set_own_keypair(&keypair);
            store.save(&keystore)?;
            keypair
        }
    };

    let request = request::register(&cli.name, &keypair)?;
    transport::exchange(&cli.host, cli.port, &request).await?;
    println!("Published public key for {}", cli.name);
    Ok(())
}

async fn keys(cli: &Cli, store: &FileKeystore) -> Result<(), ClientError> {
    let peer = prompt("Enter name to look up", MAX_NAME_LEN)?;
    let request = request::fetch_keys(&peer)?;
    let reply = require_reply(transport::exchange(&cli.host, cli.port, &request).await?)?;
    match Response::decode(&reply)? {
        Response::Keys { items, has_more } => {
            let mut keystore = store.load()?;
            keystore.set_peer_keys(
                &peer,
                items
                    .iter()
                    .map(|item| PeerKey {
                        exponent: item.exponent.clone(),
                        modulus: item.modulus.clone(),
                    })
                    .collect(),
            );
            store.save(&keystore)?;
            print!("{}", render::keys(&peer, &items, has_more));
            Ok(())
        }
        Response::Mailbox { .. } => Err(ClientError::UnexpectedResponse),
    }
}

fn require_reply(reply: Option<Vec<u8>>) -> Result<Vec<u8>, ClientError> {
    // exchange() only returns None for fire-and-forget kinds.
    reply.ok_or(ClientError::UnexpectedResponse)
}

/// Prompt until the input fits the wire bound (in encoded bytes).
fn prompt(label: &str, max: usize) -> Result<String, ClientError> {
    let stdin = std::io::stdin();
    loop {
        print!("{label}: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )
            .into());
        }
        let text = line.trim_end_matches(['\r', '\n']).to_owned();
        if text.is_empty() || text.len() > max {
            println!("Input must be at least 1 and at most {max} bytes");
            continue;
        }
        return Ok(text);
    }
}
