//! Client side of the account server line protocol.
//!
//! Every call opens its own TCP connection, writes one request and reads one
//! reply. Calls are bounded by a timeout so a hung account server cannot pin
//! a session forever.

use crate::error::AccountError;
use async_trait::async_trait;
use log::debug;
use shared::framing::{read_line, read_to_close, write_line};
use shared::{AccountRequest, LoginOutcome, UserData};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::TcpStream;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Login, load, save and logout against the account store.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn login(&self, username: &str) -> Result<LoginOutcome, AccountError>;

    async fn load(&self, username: &str) -> Result<UserData, AccountError>;

    /// Fails with [`AccountError::SaveRejected`] when the server refuses.
    async fn save(&self, user: &UserData) -> Result<(), AccountError>;

    /// Returns whether the server accepted the logout.
    async fn logout(&self, username: &str) -> Result<bool, AccountError>;
}

#[derive(Debug, Clone)]
pub struct AccountClient {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl AccountClient {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, AccountError>
    where
        F: Future<Output = Result<T, AccountError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AccountError::Timeout(self.timeout))?
    }

    /// Sends the request line plus optional body lines and returns the
    /// connection ready for reading the reply.
    async fn send(
        &self,
        request: &AccountRequest,
        body: Option<&str>,
    ) -> Result<BufReader<TcpStream>, AccountError> {
        let mut stream = BufReader::new(TcpStream::connect(self.server_addr).await?);
        write_line(stream.get_mut(), &request.encode()).await?;
        if let Some(body) = body {
            write_line(stream.get_mut(), body).await?;
        }
        debug!("account request {}", request.encode());
        Ok(stream)
    }

    /// Reads a single numeric reply line.
    async fn read_code(stream: &mut BufReader<TcpStream>) -> Result<u8, AccountError> {
        let line = read_line(stream)
            .await?
            .ok_or_else(|| AccountError::Protocol("connection closed".into()))?;
        line.trim()
            .parse()
            .map_err(|_| AccountError::Protocol(line.clone()))
    }
}

#[async_trait]
impl AccountService for AccountClient {
    async fn login(&self, username: &str) -> Result<LoginOutcome, AccountError> {
        self.with_timeout(async {
            let mut stream = self
                .send(&AccountRequest::Login(username.trim().to_string()), None)
                .await?;
            let code = Self::read_code(&mut stream).await?;
            LoginOutcome::from_code(code).ok_or_else(|| AccountError::Protocol(code.to_string()))
        })
        .await
    }

    async fn load(&self, username: &str) -> Result<UserData, AccountError> {
        self.with_timeout(async {
            let mut stream = self
                .send(&AccountRequest::Load(username.to_string()), None)
                .await?;
            let blob = read_to_close(&mut stream).await?;
            Ok::<_, AccountError>(UserData::from_blob(&blob)?)
        })
        .await
    }

    async fn save(&self, user: &UserData) -> Result<(), AccountError> {
        let blob = user.to_blob()?;
        self.with_timeout(async {
            let mut stream = self
                .send(&AccountRequest::Save(user.username.clone()), Some(&blob))
                .await?;
            match Self::read_code(&mut stream).await? {
                0 => Err(AccountError::SaveRejected),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn logout(&self, username: &str) -> Result<bool, AccountError> {
        self.with_timeout(async {
            let mut stream = self
                .send(&AccountRequest::Logout(username.trim().to_string()), None)
                .await?;
            Ok::<_, AccountError>(Self::read_code(&mut stream).await? != 0)
        })
        .await
    }
}
