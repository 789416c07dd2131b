//! Datagram commands for the word service.
//!
//! Every request is a single datagram `<opcode>;<payload>` answered by a
//! single reply datagram. Replies are plain text: a word (empty when nothing
//! matches) for `E` and `D`, `"1"`/`"0"` for `A`, `B` and `C`.

use crate::{split_command, ParseError};

/// Size of the reply buffer; bounds the longest word the service can return.
pub const BUFFER_LIMIT: usize = 1000;

/// Reply meaning "yes" to `A`, `B` and `C` requests.
pub const REPLY_TRUE: &str = "1";
/// Reply meaning "no" to `A`, `B` and `C` requests.
pub const REPLY_FALSE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryCommand {
    /// `A`: register a new word
    AddWord(String),
    /// `B`: deregister a word
    RemoveWord(String),
    /// `C`: ask whether a word is known
    Contains(String),
    /// `D`: fetch a word containing the character
    Leaf(char),
    /// `E`: fetch a word of the given length
    Stem(usize),
}

impl DictionaryCommand {
    pub fn opcode(&self) -> char {
        match self {
            DictionaryCommand::AddWord(_) => 'A',
            DictionaryCommand::RemoveWord(_) => 'B',
            DictionaryCommand::Contains(_) => 'C',
            DictionaryCommand::Leaf(_) => 'D',
            DictionaryCommand::Stem(_) => 'E',
        }
    }

    /// Encodes the command as the text of one request datagram.
    pub fn encode(&self) -> String {
        let payload = match self {
            DictionaryCommand::AddWord(word)
            | DictionaryCommand::RemoveWord(word)
            | DictionaryCommand::Contains(word) => word.clone(),
            DictionaryCommand::Leaf(ch) => ch.to_string(),
            DictionaryCommand::Stem(len) => len.to_string(),
        };
        format!("{};{}", self.opcode(), payload)
    }

    /// Decodes a request datagram. Used by the word service.
    pub fn parse(request: &str) -> Result<Self, ParseError> {
        let (opcode, payload) = split_command(request)?;

        match opcode {
            "A" => Ok(DictionaryCommand::AddWord(payload.to_string())),
            "B" => Ok(DictionaryCommand::RemoveWord(payload.to_string())),
            "C" => Ok(DictionaryCommand::Contains(payload.to_string())),
            "D" => {
                let mut chars = payload.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(DictionaryCommand::Leaf(ch)),
                    _ => Err(ParseError::InvalidPayload(payload.to_string())),
                }
            }
            "E" => payload
                .trim()
                .parse()
                .map(DictionaryCommand::Stem)
                .map_err(|_| ParseError::InvalidPayload(payload.to_string())),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Interprets a `"1"`/`"0"` reply.
pub fn reply_is_true(reply: &str) -> bool {
    reply.trim() == REPLY_TRUE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_opcode_and_payload() {
        assert_eq!(DictionaryCommand::Stem(4).encode(), "E;4");
        assert_eq!(DictionaryCommand::Leaf('a').encode(), "D;a");
        assert_eq!(DictionaryCommand::Contains("oak".into()).encode(), "C;oak");
        assert_eq!(DictionaryCommand::AddWord("elm".into()).encode(), "A;elm");
        assert_eq!(DictionaryCommand::RemoveWord("fir".into()).encode(), "B;fir");
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(
            DictionaryCommand::parse("E;0"),
            Ok(DictionaryCommand::Stem(0))
        );
        assert_eq!(
            DictionaryCommand::parse("D;é"),
            Ok(DictionaryCommand::Leaf('é'))
        );
        assert_eq!(
            DictionaryCommand::parse("C;maple"),
            Ok(DictionaryCommand::Contains("maple".into()))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_requests() {
        assert!(matches!(
            DictionaryCommand::parse("E"),
            Err(ParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            DictionaryCommand::parse("E;four"),
            Err(ParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            DictionaryCommand::parse("D;ab"),
            Err(ParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            DictionaryCommand::parse("D;"),
            Err(ParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            DictionaryCommand::parse("Z;x"),
            Err(ParseError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_reply_is_true() {
        assert!(reply_is_true("1"));
        assert!(reply_is_true("1\n"));
        assert!(!reply_is_true("0"));
        assert!(!reply_is_true(""));
    }
}
