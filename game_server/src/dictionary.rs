//! Client side of the word service datagram protocol.

use crate::error::DictionaryError;
use async_trait::async_trait;
use log::debug;
use shared::dictionary::reply_is_true;
use shared::{DictionaryCommand, BUFFER_LIMIT};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Reply timeout used by the reference deployment.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Anything that answers word service commands.
///
/// One command, one reply. Implementations must not retry; retry policy
/// belongs to the puzzle generator.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn request(&self, command: DictionaryCommand) -> Result<String, DictionaryError>;

    /// Fetches a word of `len` characters. Empty when none is available.
    async fn fetch_stem(&self, len: usize) -> Result<String, DictionaryError> {
        self.request(DictionaryCommand::Stem(len)).await
    }

    /// Fetches a word containing `ch`. Empty when none is available.
    async fn fetch_leaf(&self, ch: char) -> Result<String, DictionaryError> {
        self.request(DictionaryCommand::Leaf(ch)).await
    }

    async fn is_word(&self, word: &str) -> Result<bool, DictionaryError> {
        let reply = self.request(DictionaryCommand::Contains(word.to_string())).await?;
        Ok(reply_is_true(&reply))
    }

    async fn add_word(&self, word: &str) -> Result<bool, DictionaryError> {
        let reply = self.request(DictionaryCommand::AddWord(word.to_string())).await?;
        Ok(reply_is_true(&reply))
    }

    async fn remove_word(&self, word: &str) -> Result<bool, DictionaryError> {
        let reply = self
            .request(DictionaryCommand::RemoveWord(word.to_string()))
            .await?;
        Ok(reply_is_true(&reply))
    }
}

/// UDP client for the word service.
///
/// Every request binds its own ephemeral socket connected to the service, so
/// concurrent sessions never pick up each other's replies.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl DictionaryClient {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn exchange(&self, request: &str) -> Result<String, DictionaryError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(self.server_addr).await?;
        socket.send(request.as_bytes()).await?;

        let mut buffer = [0u8; BUFFER_LIMIT];
        let len = tokio::time::timeout(self.timeout, socket.recv(&mut buffer))
            .await
            .map_err(|_| DictionaryError::Timeout(self.timeout))??;

        Ok(String::from_utf8_lossy(&buffer[..len]).into_owned())
    }
}

#[async_trait]
impl WordSource for DictionaryClient {
    async fn request(&self, command: DictionaryCommand) -> Result<String, DictionaryError> {
        let request = command.encode();
        let reply = self.exchange(&request).await?;
        debug!("word service {} -> {:?}", request, reply);
        Ok(reply)
    }
}
