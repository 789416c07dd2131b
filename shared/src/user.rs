//! Persisted user data and per-user game state.

use crate::puzzle::{Puzzle, WordSet};
use crate::attempts_for;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayState {
    #[default]
    Idle,
    Play,
}

/// What a single guess did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Revealed a word; the puzzle is not finished yet.
    Hit,
    /// Matched nothing; attempts remain.
    Miss,
    /// Revealed the last hidden word.
    Won,
    /// Used the last attempt with words still hidden.
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub attempts: u32,
    pub puzzle: Option<Puzzle>,
    pub state: PlayState,
}

impl GameState {
    /// Starts a game on `words` in the idle state; entering the play loop
    /// switches it to `Play`.
    pub fn new_game(words: WordSet) -> Self {
        Self {
            attempts: attempts_for(words.len()),
            puzzle: Some(Puzzle::new(words)),
            state: PlayState::Idle,
        }
    }

    /// True when a puzzle exists and is still being played.
    pub fn is_in_progress(&self) -> bool {
        self.state == PlayState::Play && self.puzzle.is_some()
    }

    /// Applies a guess. Every guess costs one attempt. Returns `None` when
    /// there is no game in progress.
    pub fn apply_guess(&mut self, guess: &str) -> Option<GuessOutcome> {
        if self.state != PlayState::Play {
            return None;
        }
        let puzzle = self.puzzle.as_mut()?;

        let hit = puzzle.guess(guess);
        self.attempts = self.attempts.saturating_sub(1);

        let outcome = if puzzle.is_solved() {
            GuessOutcome::Won
        } else if self.attempts == 0 {
            GuessOutcome::Lost
        } else if hit {
            GuessOutcome::Hit
        } else {
            GuessOutcome::Miss
        };

        if matches!(outcome, GuessOutcome::Won | GuessOutcome::Lost) {
            self.state = PlayState::Idle;
        }
        Some(outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub username: String,
    pub lifetime_wins: u32,
    #[serde(default)]
    pub game_state: GameState,
}

impl UserData {
    pub fn new(username: impl Into<String>, lifetime_wins: u32) -> Self {
        Self {
            username: username.into(),
            lifetime_wins,
            game_state: GameState::default(),
        }
    }

    pub fn increment_score(&mut self) {
        self.lifetime_wins = self.lifetime_wins.saturating_add(1);
    }

    /// Encodes the user as a single line of JSON.
    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        serde_json::from_str(blob.trim())
    }
}
