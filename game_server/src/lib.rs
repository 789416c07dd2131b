//! # Game Server Library
//!
//! This library provides the game-orchestration server of the crossword game.
//! It accepts player connections over TCP, builds puzzles from words supplied
//! by the word service and keeps player accounts on the account server.
//!
//! ## Core Responsibilities
//!
//! ### Session Handling
//! Every connection is one [`session::GameSession`]: username negotiation,
//! loading saved data, the menu loop and the guess loop. A session always
//! logs its user out when it ends, however it ends.
//!
//! ### Puzzle Construction
//! [`generator::PuzzleGenerator`] fetches a stem and then leaves crossing it,
//! retrying with a fresh stem when the word service cannot supply a usable
//! leaf. The number of fresh stems is bounded.
//!
//! ### Backend Protocols
//! - Word service: one UDP datagram per request, one reply, with a timeout
//!   ([`dictionary::DictionaryClient`]).
//! - Account server: one TCP connection per request carrying a
//!   `<command>;<username>` line ([`accounts::AccountClient`]).
//!
//! Both backends sit behind traits ([`dictionary::WordSource`] and
//! [`accounts::AccountService`]) so sessions can be driven by in-memory fakes.
//!
//! ## Architecture Design
//!
//! ### Task Per Connection
//! The accept loop hands each connection to its own tokio task. A semaphore
//! bounds how many sessions run at once; further connections wait for a
//! free worker. Sessions share nothing but the backend handles.
//!
//! ### Line Protocol
//! Client traffic is newline-delimited text. Lines that expect an answer end
//! with [`shared::MESSAGE_END_DELIM`] so the client knows when to read the
//! keyboard.
//!
//! ## Module Organization
//!
//! - `accounts`: account server client
//! - `command`: menu and play input parsing
//! - `config`: command line arguments
//! - `dictionary`: word service client
//! - `error`: error types per backend boundary
//! - `generator`: randomized puzzle construction
//! - `network`: TCP accept loop
//! - `session`: per-connection state machine
//! - `word_service`: linear-scan word service for development and tests
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use game_server::config::ServerConfig;
//! use game_server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Game clients on 8080, word service on 9090, account server on 7070
//!     let config = ServerConfig::local(8080, 9090, 7070);
//!     let server = Server::bind(&config).await?;
//!
//!     // Accepts connections until the task is dropped
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod command;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod generator;
pub mod network;
pub mod session;
pub mod word_service;
