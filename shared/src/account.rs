//! Line requests answered by the account server.
//!
//! | Request             | Reply                                         |
//! |---------------------|-----------------------------------------------|
//! | `login;<username>`  | `0` duplicate, `1` existing, `2` created      |
//! | `load;<username>`   | user-data blob, then the connection closes    |
//! | `save;<username>`   | blob on the next line; `0` failure, else ok   |
//! | `logout;<username>` | `0` failure, else ok                          |

use crate::{split_command, ParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRequest {
    Login(String),
    Load(String),
    Save(String),
    Logout(String),
}

impl AccountRequest {
    pub fn username(&self) -> &str {
        match self {
            AccountRequest::Login(name)
            | AccountRequest::Load(name)
            | AccountRequest::Save(name)
            | AccountRequest::Logout(name) => name,
        }
    }

    /// Encodes the request line, without the trailing newline.
    pub fn encode(&self) -> String {
        let verb = match self {
            AccountRequest::Login(_) => "login",
            AccountRequest::Load(_) => "load",
            AccountRequest::Save(_) => "save",
            AccountRequest::Logout(_) => "logout",
        };
        format!("{};{}", verb, self.username().trim())
    }

    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (verb, username) = split_command(line.trim_end_matches(['\r', '\n']))?;
        let username = username.trim().to_string();

        match verb {
            "login" => Ok(AccountRequest::Login(username)),
            "load" => Ok(AccountRequest::Load(username)),
            "save" => Ok(AccountRequest::Save(username)),
            "logout" => Ok(AccountRequest::Logout(username)),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Result of a `login` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The username already has an active session.
    Duplicate,
    /// Logged in to an existing account.
    Existing,
    /// A new account was created and logged in.
    Created,
}

impl LoginOutcome {
    pub fn code(self) -> u8 {
        match self {
            LoginOutcome::Duplicate => 0,
            LoginOutcome::Existing => 1,
            LoginOutcome::Created => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LoginOutcome::Duplicate),
            1 => Some(LoginOutcome::Existing),
            2 => Some(LoginOutcome::Created),
            _ => None,
        }
    }
}

/// Encodes a success flag the way `save` and `logout` replies carry it.
pub fn status_code(ok: bool) -> &'static str {
    if ok {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_trims_username() {
        assert_eq!(
            AccountRequest::Login("  alice ".into()).encode(),
            "login;alice"
        );
        assert_eq!(AccountRequest::Logout("bob".into()).encode(), "logout;bob");
    }

    #[test]
    fn test_parse_each_verb() {
        assert_eq!(
            AccountRequest::parse("login;alice\n"),
            Ok(AccountRequest::Login("alice".into()))
        );
        assert_eq!(
            AccountRequest::parse("load;alice"),
            Ok(AccountRequest::Load("alice".into()))
        );
        assert_eq!(
            AccountRequest::parse("save; alice \r\n"),
            Ok(AccountRequest::Save("alice".into()))
        );
        assert_eq!(
            AccountRequest::parse("logout;alice"),
            Ok(AccountRequest::Logout("alice".into()))
        );
    }

    #[test]
    fn test_parse_rejects_free_text() {
        assert!(AccountRequest::parse("hello there").is_err());
        assert!(AccountRequest::parse("delete;alice").is_err());
    }

    #[test]
    fn test_login_codes() {
        for outcome in [
            LoginOutcome::Duplicate,
            LoginOutcome::Existing,
            LoginOutcome::Created,
        ] {
            assert_eq!(LoginOutcome::from_code(outcome.code()), Some(outcome));
        }
        assert_eq!(LoginOutcome::from_code(7), None);
    }
}
