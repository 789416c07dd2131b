//! Parsing of player input on the menu and inside a puzzle.

use crate::error::CommandError;
use shared::{EXIT_CODE, QUERY_PREFIX, SAVE_CODE};
use std::str::FromStr;

/// A menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// `Add;<word>`
    Add(String),
    /// `Remove;<word>`
    Remove(String),
    /// `New Game;<word count>`
    NewGame(usize),
    /// `Continue`, with or without a trailing `;`
    Continue,
    /// The exit code
    Exit,
}

impl FromStr for MenuCommand {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input == EXIT_CODE {
            return Ok(MenuCommand::Exit);
        }
        if input == "Continue" {
            return Ok(MenuCommand::Continue);
        }

        let (command, argument) = input.split_once(';').ok_or(CommandError::InvalidSyntax)?;
        let argument = argument.trim();

        match command.trim() {
            "Add" => word_argument(argument).map(MenuCommand::Add),
            "Remove" => word_argument(argument).map(MenuCommand::Remove),
            "New Game" => match argument.parse::<usize>() {
                Ok(count) if count > 0 => Ok(MenuCommand::NewGame(count)),
                _ => Err(CommandError::InvalidWordCount(argument.to_string())),
            },
            "Continue" => Ok(MenuCommand::Continue),
            _ => Err(CommandError::InvalidSyntax),
        }
    }
}

fn word_argument(argument: &str) -> Result<String, CommandError> {
    if argument.is_empty() {
        Err(CommandError::InvalidSyntax)
    } else {
        Ok(argument.to_string())
    }
}

/// One line typed while a puzzle is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayInput {
    /// Leave the puzzle; it stays in progress.
    Save,
    /// `?word`: ask the word service whether the word exists.
    Query(String),
    Guess(String),
}

impl FromStr for PlayInput {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input == SAVE_CODE {
            return Ok(PlayInput::Save);
        }

        if let Some(query) = input.strip_prefix(QUERY_PREFIX) {
            let word: String = query.chars().filter(|&c| c != QUERY_PREFIX).collect();
            let word = word.trim();
            return if is_word(word) {
                Ok(PlayInput::Query(word.to_string()))
            } else {
                Err(CommandError::InvalidGuess(input.to_string()))
            };
        }

        if is_word(input) {
            Ok(PlayInput::Guess(input.to_string()))
        } else {
            Err(CommandError::InvalidGuess(input.to_string()))
        }
    }
}

fn is_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_commands() {
        assert_eq!("q".parse::<MenuCommand>(), Ok(MenuCommand::Exit));
        assert_eq!(" Continue ".parse::<MenuCommand>(), Ok(MenuCommand::Continue));
        assert_eq!("Continue;".parse::<MenuCommand>(), Ok(MenuCommand::Continue));
        assert_eq!("Add;maple".parse::<MenuCommand>(), Ok(MenuCommand::Add("maple".into())));
        assert_eq!("Remove; fir ".parse::<MenuCommand>(), Ok(MenuCommand::Remove("fir".into())));
        assert_eq!("New Game;3".parse::<MenuCommand>(), Ok(MenuCommand::NewGame(3)));
    }

    #[test]
    fn test_menu_syntax_errors() {
        for input in ["", "hello", "New Game", "Add;", "Play;3", "Remove"] {
            assert_eq!(
                input.parse::<MenuCommand>(),
                Err(CommandError::InvalidSyntax),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_menu_word_count_errors() {
        assert_eq!(
            "New Game;three".parse::<MenuCommand>(),
            Err(CommandError::InvalidWordCount("three".into()))
        );
        assert_eq!(
            "New Game;0".parse::<MenuCommand>(),
            Err(CommandError::InvalidWordCount("0".into()))
        );
        assert_eq!(
            "New Game;-2".parse::<MenuCommand>(),
            Err(CommandError::InvalidWordCount("-2".into()))
        );
    }

    #[test]
    fn test_play_inputs() {
        assert_eq!("~".parse::<PlayInput>(), Ok(PlayInput::Save));
        assert_eq!("?oak".parse::<PlayInput>(), Ok(PlayInput::Query("oak".into())));
        assert_eq!("??oak?".parse::<PlayInput>(), Ok(PlayInput::Query("oak".into())));
        assert_eq!(" birch ".parse::<PlayInput>(), Ok(PlayInput::Guess("birch".into())));
    }

    #[test]
    fn test_invalid_play_inputs() {
        for input in ["", "?", "oak tree", "c4t", "~~", "?o-k"] {
            assert!(
                matches!(input.parse::<PlayInput>(), Err(CommandError::InvalidGuess(_))),
                "input {input:?}"
            );
        }
    }
}
