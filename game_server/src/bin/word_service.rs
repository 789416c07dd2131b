//! Development word service answering dictionary datagrams.

use clap::Parser;
use game_server::word_service::{serve, WordList, DEFAULT_WORDS};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// UDP port to listen on
    port: u16,
    /// Address to listen on
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Word file, one word per line
    #[clap(short, long)]
    words: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let words = match &args.words {
        Some(path) => WordList::load(path)?,
        None => WordList::new(DEFAULT_WORDS.iter().copied()),
    };

    let socket = UdpSocket::bind((args.host.as_str(), args.port)).await?;
    let words = Arc::new(Mutex::new(words));

    tokio::select! {
        result = serve(socket, words) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down word service");
        }
    }

    Ok(())
}
