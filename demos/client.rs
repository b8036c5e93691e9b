//! Interactive relay client
//!
//! Run with: cargo run --example client [HOST]
//!
//! Examples:
//!   cargo run --example client                    # connects to 127.0.0.1:12345
//!   cargo run --example client 192.168.1.10       # connects to 192.168.1.10:12345
//!   cargo run --example client localhost:9000     # connects to 127.0.0.1:9000
//!
//! Typed lines are sent to the server; broadcasts from other clients are
//! printed as they arrive. The session ends when the server disconnects.
//! Closing local input (Ctrl-D) stops sending but keeps displaying.

use std::net::SocketAddr;

use tokio::io::BufReader;

use relay_rs::{ClientConfig, ClientSession, DEFAULT_PORT};

/// Parse the target address from a command line argument.
///
/// Accepts the same forms as the server's bind argument: "HOST",
/// "HOST:PORT", or "localhost" (with or without a port).
fn parse_target_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid server address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: client [HOST]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  HOST    Server to connect to (default: 127.0.0.1:12345)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  client                     # connects to 127.0.0.1:12345");
    eprintln!("  client 192.168.1.10        # connects to 192.168.1.10:12345");
    eprintln!("  client localhost:9000      # connects to 127.0.0.1:9000");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let addr = match args.get(1) {
        Some(arg) => match parse_target_addr(arg) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
    };

    // Keep the display clean by default; RUST_LOG opens it up
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let session = match ClientSession::connect(ClientConfig::with_addr(addr)).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Connected to {}. Type lines to broadcast; Ctrl-D stops sending.", addr);

    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = session.run(input, tokio::io::stdout()).await {
        eprintln!("Session error: {}", e);
        std::process::exit(1);
    }

    println!("Disconnected.");
    Ok(())
}
