//! Per-connection game session.
//!
//! A session walks one client through username negotiation, loading its
//! saved data, the menu loop and the play loop. It owns nothing shared
//! except the backend handles in [`SessionContext`]; every session runs in
//! its own task and is served sequentially from start to end.
//!
//! A session that got past login always logs out when it ends, whether the
//! player quit, the connection dropped or a backend failed.

use crate::accounts::AccountService;
use crate::command::{MenuCommand, PlayInput};
use crate::dictionary::WordSource;
use crate::error::{CommandError, SessionError};
use crate::generator::{GeneratorConfig, PuzzleGenerator};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::framing::{read_line, write_line, write_prompt};
use shared::{GameState, GuessOutcome, LoginOutcome, PlayState, UserData};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};

const USERNAME_PROMPT: &str = "Enter your username:";

const MENU: &str = "Menu:\n  \
    Add;<word>             add a word to the dictionary\n  \
    Remove;<word>          remove a word from the dictionary\n  \
    New Game;<word count>  start a new puzzle\n  \
    Continue               resume your saved puzzle\n  \
    q                      quit";

const PLAY_GUIDE: &str =
    "Type a word to guess it, ?<word> to look a word up, or ~ to save and return to the menu.";

/// Backends shared by every session of a server.
pub struct SessionContext {
    pub accounts: Arc<dyn AccountService>,
    pub words: Arc<dyn WordSource>,
    pub generator: GeneratorConfig,
}

pub struct GameSession<R, W> {
    reader: R,
    writer: W,
    context: Arc<SessionContext>,
    rng: StdRng,
    logged_out: bool,
}

impl<R, W> GameSession<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, context: Arc<SessionContext>) -> Self {
        Self::with_rng(reader, writer, context, StdRng::from_entropy())
    }

    /// Uses `rng` for puzzle generation. Lets tests pin the layout.
    pub fn with_rng(reader: R, writer: W, context: Arc<SessionContext>, rng: StdRng) -> Self {
        Self {
            reader,
            writer,
            context,
            rng,
            logged_out: false,
        }
    }

    /// Serves the connection until the player quits or the connection ends.
    pub async fn run(mut self) -> Result<(), SessionError> {
        let Some(username) = self.negotiate_username().await? else {
            debug!("Client left before logging in");
            return Ok(());
        };

        let result = self.serve_user(&username).await;
        if !self.logged_out {
            self.logout(&username).await;
        }
        result
    }

    /// Prompts until the account server accepts a username. `None` when the
    /// client disconnects first.
    async fn negotiate_username(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            write_prompt(&mut self.writer, USERNAME_PROMPT).await?;
            let Some(line) = read_line(&mut self.reader).await? else {
                return Ok(None);
            };
            let username = line.trim();
            if username.is_empty() {
                continue;
            }

            match self.context.accounts.login(username).await? {
                LoginOutcome::Duplicate => {
                    self.say(&format!("Error: {username} is already logged in."))
                        .await?;
                    self.say("Try again.").await?;
                }
                LoginOutcome::Existing => {
                    info!("{} logged in", username);
                    self.say(&format!("Welcome back, {username}!")).await?;
                    return Ok(Some(username.to_string()));
                }
                LoginOutcome::Created => {
                    info!("Created account for {}", username);
                    self.say(&format!("Created new account for {username}."))
                        .await?;
                    return Ok(Some(username.to_string()));
                }
            }
        }
    }

    async fn serve_user(&mut self, username: &str) -> Result<(), SessionError> {
        let mut user = match self.context.accounts.load(username).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Couldn't load user data for {}: {}", username, e);
                let _ = self.say("Error: could not load your user data.").await;
                return Err(e.into());
            }
        };
        self.say(&format!("Lifetime wins: {}", user.lifetime_wins))
            .await?;

        let result = self.menu_loop(&mut user).await;
        if let Err(e) = &result {
            if !matches!(e, SessionError::Transport(_) | SessionError::Disconnected) {
                let _ = self.say(&format!("Error: {e}")).await;
            }
            self.save_quietly(&user).await;
        }
        result
    }

    async fn menu_loop(&mut self, user: &mut UserData) -> Result<(), SessionError> {
        loop {
            write_prompt(&mut self.writer, MENU).await?;
            let line = read_line(&mut self.reader)
                .await?
                .ok_or(SessionError::Disconnected)?;

            let command = match line.parse::<MenuCommand>() {
                Ok(command) => command,
                Err(e) => {
                    self.report(&e).await?;
                    self.save_quietly(user).await;
                    continue;
                }
            };

            if !self.dispatch(command, user).await? {
                return Ok(());
            }
        }
    }

    /// Runs one menu command. Returns false when the session should end.
    async fn dispatch(&mut self, command: MenuCommand, user: &mut UserData) -> Result<bool, SessionError> {
        match command {
            MenuCommand::Exit => {
                let username = user.username.clone();
                self.logout(&username).await;
                self.save_quietly(user).await;
                self.say("Goodbye!").await?;
                return Ok(false);
            }
            MenuCommand::Add(word) => {
                let message = match self.context.words.add_word(&word).await {
                    Ok(true) => format!("Added \"{word}\" to the dictionary."),
                    Ok(false) => format!("Could not add \"{word}\"."),
                    Err(e) => {
                        warn!("Add {:?} failed: {}", word, e);
                        format!("Error: could not reach the word service ({e}).")
                    }
                };
                self.say(&message).await?;
            }
            MenuCommand::Remove(word) => {
                let message = match self.context.words.remove_word(&word).await {
                    Ok(true) => format!("Removed \"{word}\" from the dictionary."),
                    Ok(false) => format!("Could not remove \"{word}\"."),
                    Err(e) => {
                        warn!("Remove {:?} failed: {}", word, e);
                        format!("Error: could not reach the word service ({e}).")
                    }
                };
                self.say(&message).await?;
            }
            MenuCommand::NewGame(word_count) => {
                self.create_new_game(word_count, user).await?;
                self.play(user).await?;
            }
            MenuCommand::Continue => {
                if user.game_state.is_in_progress() {
                    self.play(user).await?;
                } else {
                    self.report(&CommandError::NoExistingGame).await?;
                    self.save_quietly(user).await;
                }
            }
        }
        Ok(true)
    }

    async fn create_new_game(&mut self, word_count: usize, user: &mut UserData) -> Result<(), SessionError> {
        let generator = PuzzleGenerator::new(self.context.words.as_ref(), self.context.generator);
        let words = generator.generate(word_count, &mut self.rng).await?;
        debug!("{} starts a {}-word puzzle", user.username, words.len());

        user.game_state = GameState::new_game(words);
        self.save_quietly(user).await;
        Ok(())
    }

    /// The guess loop. Leaves on the save code, a win or a loss.
    async fn play(&mut self, user: &mut UserData) -> Result<(), SessionError> {
        user.game_state.state = PlayState::Play;

        while user.game_state.is_in_progress() {
            let Some(puzzle) = user.game_state.puzzle.as_ref() else {
                break;
            };
            let screen = format!(
                "{}{}\nAttempts remaining: {}",
                puzzle.render(),
                PLAY_GUIDE,
                user.game_state.attempts
            );
            write_prompt(&mut self.writer, &screen).await?;

            let line = read_line(&mut self.reader)
                .await?
                .ok_or(SessionError::Disconnected)?;

            match line.parse::<PlayInput>() {
                Err(e) => self.report(&e).await?,
                Ok(PlayInput::Save) => {
                    self.say("Game saved.").await?;
                    break;
                }
                Ok(PlayInput::Query(word)) => {
                    let message = match self.context.words.is_word(&word).await {
                        Ok(true) => "This word is in the database".to_string(),
                        Ok(false) => "This is not in the database".to_string(),
                        Err(e) => {
                            warn!("Lookup of {:?} failed: {}", word, e);
                            format!("Error: could not reach the word service ({e}).")
                        }
                    };
                    self.say(&message).await?;
                }
                Ok(PlayInput::Guess(word)) => {
                    let Some(outcome) = user.game_state.apply_guess(&word) else {
                        break;
                    };
                    self.announce(outcome, &word, user).await?;
                    self.save_quietly(user).await;
                }
            }
        }

        self.save_quietly(user).await;
        Ok(())
    }

    async fn announce(&mut self, outcome: GuessOutcome, word: &str, user: &mut UserData) -> Result<(), SessionError> {
        match outcome {
            GuessOutcome::Hit => {
                self.say(&format!("*Successful guess: '{word}'. Puzzle updated."))
                    .await?;
            }
            GuessOutcome::Miss => self.say("*Unsuccessful guess").await?,
            GuessOutcome::Won => {
                user.increment_score();
                info!("{} solved a puzzle ({} wins)", user.username, user.lifetime_wins);
                if let Some(puzzle) = &user.game_state.puzzle {
                    self.say(puzzle.render().trim_end()).await?;
                }
                self.say("You win!").await?;
                self.say(&format!("Lifetime wins: {}", user.lifetime_wins))
                    .await?;
            }
            GuessOutcome::Lost => {
                debug!("{} ran out of attempts", user.username);
                self.say("You lose!").await?;
            }
        }
        Ok(())
    }

    async fn say(&mut self, line: &str) -> Result<(), SessionError> {
        write_line(&mut self.writer, line).await?;
        Ok(())
    }

    async fn report(&mut self, error: &CommandError) -> Result<(), SessionError> {
        self.say(&format!("Error: {error}")).await
    }

    /// Saves and reports a failure to the player without ending the session.
    async fn save_quietly(&mut self, user: &UserData) {
        if let Err(e) = self.context.accounts.save(user).await {
            warn!("Couldn't save game for {}: {}", user.username, e);
            let _ = write_line(&mut self.writer, &format!("Error: {e}")).await;
        }
    }

    async fn logout(&mut self, username: &str) {
        self.logged_out = true;
        match self.context.accounts.logout(username).await {
            Ok(true) => info!("{} logged out", username),
            Ok(false) => warn!("Account server refused logout of {}", username),
            Err(e) => warn!("Couldn't log out {}: {}", username, e),
        }
    }
}
