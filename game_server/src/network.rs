//! Server network layer accepting game clients over TCP

use crate::accounts::AccountClient;
use crate::config::ServerConfig;
use crate::dictionary::DictionaryClient;
use crate::error::SessionError;
use crate::session::{GameSession, SessionContext};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{lookup_host, TcpListener, TcpStream};
use tokio::sync::Semaphore;

/// Accept loop handing every connection to its own game session
pub struct Server {
    listener: TcpListener,
    context: Arc<SessionContext>,
    workers: Arc<Semaphore>,
}

impl Server {
    /// Binds the listening socket and resolves both backends.
    pub async fn bind(config: &ServerConfig) -> io::Result<Self> {
        let word_addr = resolve(&config.backend_host, config.word_port).await?;
        let account_addr = resolve(&config.backend_host, config.account_port).await?;

        let context = SessionContext {
            accounts: Arc::new(AccountClient::new(account_addr, config.account_timeout)),
            words: Arc::new(DictionaryClient::new(word_addr, config.dictionary_timeout)),
            generator: config.generator,
        };

        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(
            "Server listening on {} (word service {}, account server {})",
            listener.local_addr()?,
            word_addr,
            account_addr
        );

        Ok(Self::with_context(listener, Arc::new(context), config.workers))
    }

    /// Serves sessions on `listener` against arbitrary backends.
    pub fn with_context(listener: TcpListener, context: Arc<SessionContext>, workers: usize) -> Self {
        Self {
            listener,
            context,
            workers: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Main accept loop. Connections beyond the worker count wait for a
    /// free worker before their session starts.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let permit = Arc::clone(&self.workers)
                .acquire_owned()
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    continue;
                }
            };
            info!("Client connected from {}", addr);

            let context = Arc::clone(&self.context);
            tokio::spawn(async move {
                handle_connection(stream, addr, context).await;
                drop(permit);
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, addr: SocketAddr, context: Arc<SessionContext>) {
    let (reader, writer) = stream.into_split();
    let session = GameSession::new(BufReader::new(reader), writer, context);

    match session.run().await {
        Ok(()) => info!("Client {} finished", addr),
        Err(SessionError::Disconnected) => info!("Client {} disconnected", addr),
        Err(SessionError::Transport(e)) => warn!("Lost connection with {}: {}", addr, e),
        Err(e) => error!("Session for {} failed: {}", addr, e),
    }
    debug!("Worker for {} released", addr);
}

async fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    lookup_host((host, port)).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("could not resolve {host}:{port}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;
    use shared::framing::{read_line, write_line};

    #[tokio::test]
    async fn test_bind_resolves_backends_and_reports_address() {
        let mut config = ServerConfig::local(0, 9, 9);
        config.backend_host = "localhost".to_string();

        let server = Server::bind(&config).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_session_is_served_over_tcp() {
        // Nothing listens on the backend port, so login fails.
        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let unused = closed.local_addr().unwrap();
        drop(closed);
        let context = Arc::new(SessionContext {
            accounts: Arc::new(AccountClient::new(unused, std::time::Duration::from_millis(50))),
            words: Arc::new(DictionaryClient::new(unused, std::time::Duration::from_millis(50))),
            generator: GeneratorConfig::default(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = Server::with_context(listener, context, 1);
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let mut stream = BufReader::new(TcpStream::connect(addr).await.unwrap());
        let prompt = read_line(&mut stream).await.unwrap().unwrap();
        assert!(prompt.ends_with(shared::MESSAGE_END_DELIM));

        write_line(stream.get_mut(), "alice").await.unwrap();
        assert_eq!(read_line(&mut stream).await.unwrap(), None);
    }
}
