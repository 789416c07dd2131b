//! Types and codecs shared by the game server, the account server and the
//! terminal client.
//!
//! - `dictionary`: datagram commands understood by the word service
//! - `account`: line requests understood by the account server
//! - `framing`: line reading/writing over tokio streams
//! - `puzzle`: word sets and the crossword grid built from them
//! - `user`: persisted user data and per-user game state

pub mod account;
pub mod dictionary;
pub mod framing;
pub mod puzzle;
pub mod user;

pub use account::{AccountRequest, LoginOutcome};
pub use dictionary::{DictionaryCommand, BUFFER_LIMIT};
pub use puzzle::{Leaf, Puzzle, WordSet};
pub use user::{GameState, GuessOutcome, PlayState, UserData};

/// Marks the end of a prompt on the game client protocol. The client keeps
/// printing server lines until it sees one ending with this marker.
pub const MESSAGE_END_DELIM: &str = "<EOM>";

/// Menu input that logs the user out and closes the connection.
pub const EXIT_CODE: &str = "q";

/// Play-loop input that leaves the puzzle and returns to the menu.
pub const SAVE_CODE: &str = "~";

/// Play-loop prefix for asking the word service whether a word exists.
pub const QUERY_PREFIX: char = '?';

/// Upper bound on attempts granted for a single puzzle.
pub const MAX_ATTEMPTS: u32 = 15;

/// Error produced when a wire message cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing ';' separator in {0:?}")]
    MissingSeparator(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("invalid payload {0:?}")]
    InvalidPayload(String),
}

/// Attempts granted for a freshly generated puzzle of `word_count` words.
pub fn attempts_for(word_count: usize) -> u32 {
    let doubled = u32::try_from(word_count.saturating_mul(2)).unwrap_or(u32::MAX);
    doubled.min(MAX_ATTEMPTS)
}

/// Splits `<command>;<payload>` at the first separator.
pub(crate) fn split_command(line: &str) -> Result<(&str, &str), ParseError> {
    line.split_once(';')
        .ok_or_else(|| ParseError::MissingSeparator(line.to_string()))
}
