use clap::Parser;
use game_server::config::{Args, ServerConfig};
use game_server::network::Server;
use log::{error, info};

/// Parses the command line, then serves game sessions until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        eprintln!("Hint: set RUST_LOG=info to see server activity");
    }
    env_logger::init();

    // Wrong arity prints usage and exits with status 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    let config = ServerConfig::from(args);

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Could not create server on {}: {}", config.bind_addr(), e);
            return Err(e.into());
        }
    };
    info!("Listening for incoming requests with {} workers", config.workers);

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
