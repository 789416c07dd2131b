//! Newline-delimited text framing over tokio streams.
//!
//! All three TCP conversations in the system (client ↔ game server, game
//! server ↔ account server, direct clients ↔ account server) are plain UTF-8
//! lines. Prompts on the game protocol additionally end with
//! [`MESSAGE_END_DELIM`] so the client knows when to read the keyboard.

use crate::MESSAGE_END_DELIM;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Longest line accepted from a peer, in bytes. Protects against a peer that
/// never sends a newline.
pub const MAX_LINE_LENGTH: u64 = 64 * 1024;

/// Reads one line without its line terminator.
///
/// Returns `Ok(None)` once the peer has closed the stream. Lines longer than
/// [`MAX_LINE_LENGTH`] fail with `InvalidData`.
pub async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader.take(MAX_LINE_LENGTH).read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }

    if !line.ends_with('\n') && read as u64 >= MAX_LINE_LENGTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {MAX_LINE_LENGTH} bytes"),
        ));
    }

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Reads everything until the peer closes the stream.
pub async fn read_to_close<R>(reader: &mut R) -> io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = String::new();
    while let Some(line) = read_line(reader).await? {
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

/// Writes `line` followed by a newline and flushes.
pub async fn write_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Writes a prompt terminated by the message-end delimiter.
pub async fn write_prompt<W>(writer: &mut W, prompt: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(prompt.as_bytes()).await?;
    writer.write_all(MESSAGE_END_DELIM.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Splits a received line into its text and whether it closed a prompt.
pub fn strip_prompt_delim(line: &str) -> (&str, bool) {
    match line.strip_suffix(MESSAGE_END_DELIM) {
        Some(text) => (text, true),
        None => (line, false),
    }
}
