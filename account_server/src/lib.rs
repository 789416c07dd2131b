//! # Account Server Library
//!
//! Keeps player accounts for the crossword game and tracks who is logged in,
//! so that one username never has two sessions at once.
//!
//! ## Module Organization
//!
//! ### Store Module (`store`)
//! The registry of accounts and logged-in usernames, persisted to a plain
//! `username,wins` file. Opened once at startup and flushed at shutdown.
//!
//! ### Network Module (`network`)
//! A capacity-gated TCP accept loop. Each connection is either a single
//! request from the game server (`login`, `load`, `save`, `logout`) or a
//! person connecting directly, who logs in and chats with an echo loop.
//!
//! ### Config Module (`config`)
//! Command line arguments.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use account_server::network::AccountServer;
//! use account_server::store::AccountStore;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Mutex::new(AccountStore::open("UserAccounts.txt")?));
//!     let listener = TcpListener::bind("127.0.0.1:7070").await?;
//!
//!     // At most 20 connections are served at once
//!     AccountServer::with_store(listener, store, 20).run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod network;
pub mod store;
