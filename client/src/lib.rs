//! # Game Client Library
//!
//! A terminal client for the crossword game server. The server drives the
//! whole conversation; the client only shows what it receives and forwards
//! what the player types.
//!
//! ## Protocol
//!
//! Server output is newline-delimited text. A line ending with
//! [`shared::MESSAGE_END_DELIM`] is a prompt: the client prints it without
//! the delimiter, reads one line from the keyboard and sends it back. Every
//! other line is printed as is.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! The TCP connection and the relay loop between server and terminal.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use tokio::io::{stdin, stdout, BufReader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect("127.0.0.1:8080").await?;
//!     client.run(BufReader::new(stdin()), stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod network;
