use clap::Parser;
use client::network::{Client, SessionEnd};
use log::info;
use tokio::io::{stdin, stdout, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let client = Client::connect(&args.server).await?;

    match client.run(BufReader::new(stdin()), stdout()).await? {
        SessionEnd::ServerClosed => println!("Connection closed by server."),
        SessionEnd::InputClosed => info!("Input closed, disconnecting"),
    }

    Ok(())
}
