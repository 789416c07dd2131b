//! Error types for the game server.
//!
//! Each backend boundary has its own error so callers can decide whether a
//! failure is fatal for the session, reported and retried, or swallowed.

use std::io;
use std::time::Duration;

/// Failures talking to the word service.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("word service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("word service unreachable: {0}")]
    Io(#[from] io::Error),
}

/// Failures talking to the account server.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account server unreachable: {0}")]
    Io(#[from] io::Error),

    #[error("account server did not answer within {0:?}")]
    Timeout(Duration),

    #[error("unexpected reply from account server: {0:?}")]
    Protocol(String),

    #[error("invalid user data: {0}")]
    Blob(#[from] serde_json::Error),

    #[error("Couldn't save game.")]
    SaveRejected,
}

/// Failures building a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("word count must be at least 1")]
    EmptyPuzzle,

    #[error("could not build a puzzle after {0} stem attempts")]
    StemAttemptsExhausted(u32),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Menu input the session cannot act on. Reported to the player, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid command syntax. Use <command>;<argument>.")]
    InvalidSyntax,

    #[error("Invalid word count: {0:?}. Enter a whole number of at least 1.")]
    InvalidWordCount(String),

    #[error("No existing game to continue.")]
    NoExistingGame,

    #[error("Invalid guess: {0:?}. Use letters only.")]
    InvalidGuess(String),
}

/// Failures that end a game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("lost connection with client: {0}")]
    Transport(#[from] io::Error),

    #[error("client disconnected")]
    Disconnected,

    #[error("account server failure: {0}")]
    Account(#[from] AccountError),

    #[error("puzzle generation failed: {0}")]
    Generate(#[from] GenerateError),
}
