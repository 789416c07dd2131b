use log::{debug, info};
use shared::framing::{read_line, strip_prompt_delim, write_line};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// Why a conversation with the server ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection
    ServerClosed,
    /// The local input ran out while the server was waiting for a line
    InputClosed,
}

pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(server_addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(server_addr).await?;
        info!("Connected to {}", stream.peer_addr()?);
        let (reader, writer) = stream.into_split();
        Ok(Client {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Relays server lines to `output` and, whenever the server asks for
    /// input, one line from `input` back to the server.
    pub async fn run<I, O>(mut self, input: I, output: O) -> io::Result<SessionEnd>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let end = relay(&mut self.reader, &mut self.writer, input, output).await?;
        let _ = self.writer.shutdown().await;
        Ok(end)
    }
}

/// The conversation loop behind [`Client::run`], over any streams.
pub async fn relay<SR, SW, I, O>(
    server_reader: &mut SR,
    server_writer: &mut SW,
    mut input: I,
    mut output: O,
) -> io::Result<SessionEnd>
where
    SR: AsyncBufRead + Unpin,
    SW: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    loop {
        let Some(line) = read_line(server_reader).await? else {
            debug!("Server closed the connection");
            return Ok(SessionEnd::ServerClosed);
        };

        let (text, is_prompt) = strip_prompt_delim(&line);
        if !is_prompt {
            write_line(&mut output, text).await?;
            continue;
        }

        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n> ").await?;
        output.flush().await?;

        let Some(reply) = read_line(&mut input).await? else {
            return Ok(SessionEnd::InputClosed);
        };
        write_line(server_writer, &reply).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::framing::write_prompt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_relay_answers_prompts_only() {
        let mut server_output = "Welcome\nEnter your username:<EOM>\nHello alice\nbye\n".as_bytes();
        let mut server_input = Vec::new();
        let mut screen = Vec::new();

        let end = relay(
            &mut server_output,
            &mut server_input,
            "alice\nunused\n".as_bytes(),
            &mut screen,
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::ServerClosed);
        assert_eq!(String::from_utf8(server_input).unwrap(), "alice\n");
        assert_eq!(
            String::from_utf8(screen).unwrap(),
            "Welcome\nEnter your username:\n> Hello alice\nbye\n"
        );
    }

    #[tokio::test]
    async fn test_relay_stops_when_input_ends() {
        let mut server_output = "Menu:<EOM>\n".as_bytes();
        let mut server_input = Vec::new();

        let end = relay(&mut server_output, &mut server_input, "".as_bytes(), Vec::new())
            .await
            .unwrap();

        assert_eq!(end, SessionEnd::InputClosed);
        assert!(server_input.is_empty());
    }

    #[tokio::test]
    async fn test_client_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            write_prompt(&mut writer, "Enter your username:").await.unwrap();
            let name = read_line(&mut reader).await.unwrap().unwrap();
            write_line(&mut writer, &format!("Goodbye {name}")).await.unwrap();
        });

        let client = Client::connect(&addr.to_string()).await.unwrap();
        let mut screen = Vec::new();
        let end = client.run("bob\n".as_bytes(), &mut screen).await.unwrap();
        server.await.unwrap();

        assert_eq!(end, SessionEnd::ServerClosed);
        assert!(String::from_utf8(screen).unwrap().ends_with("Goodbye bob\n"));
    }
}
