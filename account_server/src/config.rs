//! Command line configuration for the account server.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ACCOUNTS_FILE: &str = "UserAccounts.txt";
pub const DEFAULT_WORKERS: usize = 20;

/// Crossword account server
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// Port to listen on
    pub port: u16,
    /// Address to listen on
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,
    /// File holding one `username,wins` line per account
    #[clap(short, long, default_value = DEFAULT_ACCOUNTS_FILE)]
    pub accounts_file: PathBuf,
    /// Connections served at the same time; further connections are turned away
    #[clap(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountServerConfig {
    pub host: String,
    pub port: u16,
    pub accounts_file: PathBuf,
    pub workers: usize,
}

impl AccountServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for AccountServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            accounts_file: args.accounts_file,
            workers: args.workers.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccountServerConfig::from(Args::try_parse_from(["account_server", "7070"]).unwrap());
        assert_eq!(config.bind_addr(), "127.0.0.1:7070");
        assert_eq!(config.accounts_file, PathBuf::from("UserAccounts.txt"));
        assert_eq!(config.workers, 20);
    }

    #[test]
    fn test_options() {
        let args = Args::try_parse_from([
            "account_server",
            "7070",
            "--accounts-file",
            "/tmp/accounts.txt",
            "--workers",
            "2",
        ])
        .unwrap();
        let config = AccountServerConfig::from(args);
        assert_eq!(config.accounts_file, PathBuf::from("/tmp/accounts.txt"));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_port_is_required() {
        assert!(Args::try_parse_from(["account_server"]).is_err());
        assert!(Args::try_parse_from(["account_server", "1", "2"]).is_err());
    }
}
