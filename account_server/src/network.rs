//! Account server network layer
//!
//! One TCP listener serves two kinds of peers:
//! - the game server, which sends a single `<command>;<username>` request
//!   right after connecting and reads one reply
//! - people connecting directly, who are greeted, log in interactively and
//!   get their lines echoed back until they quit
//!
//! The two are told apart by the first line: a request arriving within
//! [`FIRST_LINE_WAIT`] that parses as an account request is served as one.

use crate::config::AccountServerConfig;
use crate::store::{AccountStore, StoreError};
use log::{debug, error, info, warn};
use shared::account::status_code;
use shared::framing::{read_line, write_line};
use shared::{AccountRequest, LoginOutcome, UserData, EXIT_CODE};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Semaphore};

/// How long a new connection may stay silent before it is greeted as a
/// direct client.
pub const FIRST_LINE_WAIT: Duration = Duration::from_millis(300);

pub const SERVER_FULL: &str = "The server is currently full; try again later.";
pub const GREETING: &str = "Welcome to the server! Please enter your username: ";

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct AccountServer {
    listener: TcpListener,
    store: Arc<Mutex<AccountStore>>,
    workers: Arc<Semaphore>,
    first_line_wait: Duration,
}

impl AccountServer {
    pub async fn bind(config: &AccountServerConfig, store: Arc<Mutex<AccountStore>>) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!("The account server is running on {}", listener.local_addr()?);
        Ok(Self::with_store(listener, store, config.workers))
    }

    pub fn with_store(listener: TcpListener, store: Arc<Mutex<AccountStore>>, workers: usize) -> Self {
        Self {
            listener,
            store,
            workers: Arc::new(Semaphore::new(workers.max(1))),
            first_line_wait: FIRST_LINE_WAIT,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn store(&self) -> Arc<Mutex<AccountStore>> {
        Arc::clone(&self.store)
    }

    /// Accepts connections until the listener fails. A connection arriving
    /// while every worker is busy is told so and closed.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (mut stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    continue;
                }
            };
            debug!("Connection from {}", addr);

            let Ok(permit) = Arc::clone(&self.workers).try_acquire_owned() else {
                warn!("Rejecting {}: all workers busy", addr);
                tokio::spawn(async move {
                    let _ = write_line(&mut stream, SERVER_FULL).await;
                    let _ = stream.shutdown().await;
                });
                continue;
            };

            let store = Arc::clone(&self.store);
            let wait = self.first_line_wait;
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, store, wait).await {
                    warn!("Connection with {} failed: {}", addr, e);
                }
                drop(permit);
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    store: Arc<Mutex<AccountStore>>,
    wait: Duration,
) -> Result<(), ConnectionError> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let first_line = match tokio::time::timeout(wait, read_line(&mut reader)).await {
        Ok(line) => match line? {
            Some(line) => Some(line),
            None => return Ok(()),
        },
        Err(_) => None,
    };

    if let Some(request) = first_line.as_deref().and_then(|l| AccountRequest::parse(l).ok()) {
        serve_request(request, &mut reader, &mut writer, &store).await?;
    } else {
        serve_direct_client(first_line, &mut reader, &mut writer, &store).await?;
    }
    writer.shutdown().await?;
    Ok(())
}

/// Answers one request from the game server.
pub async fn serve_request<R, W>(
    request: AccountRequest,
    reader: &mut R,
    writer: &mut W,
    store: &Mutex<AccountStore>,
) -> Result<(), ConnectionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    debug!("Request {}", request.encode());
    match request {
        AccountRequest::Login(username) => {
            let outcome = store.lock().await.login(&username)?;
            write_line(writer, &outcome.code().to_string()).await?;
        }
        AccountRequest::Load(username) => {
            let user = store.lock().await.load(&username);
            match user.map(|u| u.to_blob()) {
                Some(Ok(blob)) => write_line(writer, &blob).await?,
                Some(Err(e)) => error!("Couldn't encode data of {}: {}", username, e),
                None => warn!("Load of unknown account {}", username),
            }
        }
        AccountRequest::Save(username) => {
            let blob = read_line(reader).await?.unwrap_or_default();
            let saved = match UserData::from_blob(&blob) {
                Ok(user) if user.username == username.trim() => store.lock().await.save(user)?,
                Ok(user) => {
                    warn!("Save for {} carried data of {}", username, user.username);
                    false
                }
                Err(e) => {
                    warn!("Save for {} carried bad data: {}", username, e);
                    false
                }
            };
            write_line(writer, status_code(saved)).await?;
        }
        AccountRequest::Logout(username) => {
            let done = store.lock().await.logout(&username)?;
            write_line(writer, status_code(done)).await?;
        }
    }
    Ok(())
}

/// Interactive login followed by an echo loop. Leaving, by the exit code or
/// by disconnecting, logs the user out.
pub async fn serve_direct_client<R, W>(
    mut pending: Option<String>,
    reader: &mut R,
    writer: &mut W,
    store: &Mutex<AccountStore>,
) -> Result<(), ConnectionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(writer, GREETING).await?;

    let username = loop {
        let line = match pending.take() {
            Some(line) => line,
            None => match read_line(reader).await? {
                Some(line) => line,
                None => return Ok(()),
            },
        };
        let username = line.trim().to_string();
        if username.is_empty() {
            write_line(writer, "invalid username, please try again.").await?;
            continue;
        }

        let outcome = store.lock().await.login(&username)?;
        match outcome {
            LoginOutcome::Duplicate => {
                write_line(writer, &format!("{username} is already logged in; please try again."))
                    .await?;
            }
            LoginOutcome::Existing => {
                write_line(writer, &format!("Logging in as: {username}")).await?;
                break username;
            }
            LoginOutcome::Created => {
                write_line(writer, &format!("Creating new account: {username}")).await?;
                break username;
            }
        }
    };

    let result = echo(&username, reader, writer).await;
    store.lock().await.logout(&username)?;
    info!("{} left the account server", username);
    result
}

async fn echo<R, W>(username: &str, reader: &mut R, writer: &mut W) -> Result<(), ConnectionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(writer, &format!("Welcome to the server {username}!")).await?;
    write_line(writer, &format!("Enter '{EXIT_CODE}' to quit.")).await?;

    while let Some(line) = read_line(reader).await? {
        if line.trim().eq_ignore_ascii_case(EXIT_CODE) {
            write_line(writer, "Ending communication").await?;
            break;
        }
        write_line(writer, &format!("Server received: {line}")).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> Mutex<AccountStore> {
        Mutex::new(AccountStore::open(dir.path().join("accounts.txt")).unwrap())
    }

    async fn request(store: &Mutex<AccountStore>, request: AccountRequest, body: &str) -> String {
        let mut reader = body.as_bytes();
        let mut output = Vec::new();
        serve_request(request, &mut reader, &mut output, store)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_login_and_logout_replies() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert_eq!(request(&store, AccountRequest::Login("alice".into()), "").await, "2\n");
        assert_eq!(request(&store, AccountRequest::Login("alice".into()), "").await, "0\n");
        assert_eq!(request(&store, AccountRequest::Logout("alice".into()), "").await, "1\n");
        assert_eq!(request(&store, AccountRequest::Logout("alice".into()), "").await, "0\n");
        assert_eq!(request(&store, AccountRequest::Login("alice".into()), "").await, "1\n");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_blob() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        request(&store, AccountRequest::Login("bob".into()), "").await;

        let user = UserData::new("bob", 3);
        let blob = user.to_blob().unwrap();
        let reply = request(&store, AccountRequest::Save("bob".into()), &format!("{blob}\n")).await;
        assert_eq!(reply, "1\n");

        let reply = request(&store, AccountRequest::Load("bob".into()), "").await;
        assert_eq!(UserData::from_blob(&reply).unwrap(), user);
    }

    #[tokio::test]
    async fn test_bad_saves_are_refused() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        request(&store, AccountRequest::Login("carol".into()), "").await;

        let other = UserData::new("dave", 9).to_blob().unwrap();
        assert_eq!(request(&store, AccountRequest::Save("carol".into()), &other).await, "0\n");
        assert_eq!(request(&store, AccountRequest::Save("carol".into()), "{oops").await, "0\n");
        assert_eq!(request(&store, AccountRequest::Save("carol".into()), "").await, "0\n");

        let ghost = UserData::new("ghost", 1).to_blob().unwrap();
        assert_eq!(request(&store, AccountRequest::Save("ghost".into()), &ghost).await, "0\n");
    }

    #[tokio::test]
    async fn test_load_of_unknown_account_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(request(&store, AccountRequest::Load("nobody".into()), "").await, "");
    }

    #[tokio::test]
    async fn test_direct_client_conversation() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.lock().await.login("erin").unwrap();

        let mut reader = "\nerin\nfrank\nhello\nQ\nignored\n".as_bytes();
        let mut output = Vec::new();
        serve_direct_client(None, &mut reader, &mut output, &store)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        let expected = [
            GREETING,
            "invalid username, please try again.",
            "erin is already logged in; please try again.",
            "Creating new account: frank",
            "Welcome to the server frank!",
            "Enter 'q' to quit.",
            "Server received: hello",
            "Ending communication",
        ];
        assert_eq!(output, expected.join("\n") + "\n");
        assert!(!store.lock().await.is_logged_in("frank"));
    }

    #[tokio::test]
    async fn test_direct_client_disconnect_logs_out() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut reader = "gina\nhi\n".as_bytes();
        let mut output = Vec::new();
        serve_direct_client(None, &mut reader, &mut output, &store)
            .await
            .unwrap();

        let guard = store.lock().await;
        assert!(!guard.is_logged_in("gina"));
        assert!(guard.load("gina").is_some());
    }

    #[tokio::test]
    async fn test_pending_first_line_is_the_username() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut reader = "q\n".as_bytes();
        let mut output = Vec::new();
        serve_direct_client(Some("hank".into()), &mut reader, &mut output, &store)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Creating new account: hank"));
        assert!(output.ends_with("Ending communication\n"));
    }
}
