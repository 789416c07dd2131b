//! Command line configuration for the game server.

use crate::generator::{GeneratorConfig, DEFAULT_MAX_STEM_ATTEMPTS};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 20;

/// Crossword game server
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// Address to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Port of the word service (UDP)
    pub word_port: u16,
    /// Port of the account server (TCP)
    pub account_port: u16,
    /// Host running the word service and the account server
    #[clap(long, default_value = "127.0.0.1")]
    pub backend_host: String,
    /// Sessions served at the same time; further connections wait
    #[clap(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
    /// Word service reply timeout in milliseconds
    #[clap(long, default_value = "2000")]
    pub dictionary_timeout_ms: u64,
    /// Account server reply timeout in milliseconds
    #[clap(long, default_value = "5000")]
    pub account_timeout_ms: u64,
    /// Fresh stems tried before a new game gives up
    #[clap(long, default_value_t = DEFAULT_MAX_STEM_ATTEMPTS)]
    pub max_stem_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub backend_host: String,
    pub word_port: u16,
    pub account_port: u16,
    pub workers: usize,
    pub dictionary_timeout: Duration,
    pub account_timeout: Duration,
    pub generator: GeneratorConfig,
}

impl ServerConfig {
    /// Everything on one host with default limits.
    pub fn local(port: u16, word_port: u16, account_port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port,
            backend_host: "127.0.0.1".to_string(),
            word_port,
            account_port,
            workers: DEFAULT_WORKERS,
            dictionary_timeout: crate::dictionary::DEFAULT_TIMEOUT,
            account_timeout: crate::accounts::DEFAULT_TIMEOUT,
            generator: GeneratorConfig::default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            backend_host: args.backend_host,
            word_port: args.word_port,
            account_port: args.account_port,
            workers: args.workers.max(1),
            dictionary_timeout: Duration::from_millis(args.dictionary_timeout_ms),
            account_timeout: Duration::from_millis(args.account_timeout_ms),
            generator: GeneratorConfig {
                max_stem_attempts: args.max_stem_attempts.max(1),
            },
        }
    }
}
