use account_server::config::{AccountServerConfig, Args};
use account_server::network::AccountServer;
use account_server::store::AccountStore;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Parses the command line, loads the accounts file and serves until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        eprintln!("Hint: set RUST_LOG=info to see server activity");
    }
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    let config = AccountServerConfig::from(args);

    let store = Arc::new(Mutex::new(AccountStore::open(&config.accounts_file)?));
    let server = AccountServer::bind(&config, Arc::clone(&store)).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    store.lock().await.flush()?;
    info!("Accounts saved to {}", config.accounts_file.display());
    Ok(())
}
