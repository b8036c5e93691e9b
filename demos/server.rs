//! Broadcast relay server
//!
//! Run with: cargo run --example server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example server                    # binds to 0.0.0.0:12345
//!   cargo run --example server localhost          # binds to 127.0.0.1:12345
//!   cargo run --example server 127.0.0.1:9000     # binds to 127.0.0.1:9000
//!
//! Every byte a connected client sends is relayed to all other connected
//! clients. Try it with several `cargo run --example client` sessions, or
//! plain `nc localhost 12345`.

use std::net::SocketAddr;

use relay_rs::{RelayServer, ServerConfig, DEFAULT_PORT};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:12345
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "0.0.0.0" -> 0.0.0.0:12345
/// - "127.0.0.1:9000" -> 127.0.0.1:9000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    // Replace "localhost" with "127.0.0.1"
    let normalized = arg.replace("localhost", "127.0.0.1");

    // Try parsing as SocketAddr first (includes port)
    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Try parsing as IP address without port
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:12345)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  server                     # binds to 0.0.0.0:12345");
    eprintln!("  server localhost           # binds to 127.0.0.1:12345");
    eprintln!("  server 127.0.0.1:9000     # binds to 127.0.0.1:9000");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relay_rs=debug".parse()?)
                .add_directive("server=debug".parse()?),
        )
        .init();

    let config = ServerConfig::default().bind(bind_addr);

    println!("Starting relay server on {}", config.bind_addr);
    println!("Connect with: cargo run --example client [HOST]");
    println!();

    let server = RelayServer::new(config);

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
