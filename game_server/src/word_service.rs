//! Development word service.
//!
//! A linear-scan word list answering the datagram protocol spoken by
//! [`DictionaryClient`](crate::dictionary::DictionaryClient). Good enough for
//! local play and for tests; it makes no attempt to be fast.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use shared::dictionary::{REPLY_FALSE, REPLY_TRUE};
use shared::{DictionaryCommand, BUFFER_LIMIT};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;

/// Served when no word file is given.
pub const DEFAULT_WORDS: &[&str] = &[
    "apple", "banana", "birch", "cedar", "cherry", "crane", "delta", "eagle", "fable", "garden",
    "harbor", "island", "jungle", "kettle", "lemon", "maple", "meadow", "nectar", "orange",
    "pepper", "quartz", "river", "saddle", "timber", "umbrella", "valley", "walnut", "yellow",
    "zebra", "oak", "elm", "ash", "fir", "yew", "ivy", "cat", "dog", "owl", "bee", "ant",
];

#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for word in words {
            list.add(&word.into());
        }
        list
    }

    /// Reads one word per line. Blank lines are skipped, as is anything
    /// [`add`](Self::add) refuses.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text.lines().map(str::trim).filter(|w| !w.is_empty())))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Returns false when the word was already present.
    /// Adds a word made of letters only; players cannot type anything else.
    pub fn add(&mut self, word: &str) -> bool {
        if word.is_empty() || !word.chars().all(char::is_alphabetic) || self.contains(word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    pub fn remove(&mut self, word: &str) -> bool {
        match self.words.iter().position(|w| w == word) {
            Some(index) => {
                self.words.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// A random word of exactly `len` characters, or any word for zero.
    pub fn random_of_length<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Option<&str> {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| len == 0 || w.chars().count() == len)
            .collect();
        candidates.choose(rng).copied().map(String::as_str)
    }

    pub fn random_containing<R: Rng + ?Sized>(&self, ch: char, rng: &mut R) -> Option<&str> {
        let candidates: Vec<&String> = self.words.iter().filter(|w| w.contains(ch)).collect();
        candidates.choose(rng).copied().map(String::as_str)
    }

    /// Answers one request. Unknown words and empty searches produce the
    /// protocol's negative replies rather than errors.
    pub fn respond<R: Rng + ?Sized>(&mut self, command: &DictionaryCommand, rng: &mut R) -> String {
        let flag = |ok: bool| (if ok { REPLY_TRUE } else { REPLY_FALSE }).to_string();
        match command {
            DictionaryCommand::AddWord(word) => flag(self.add(word)),
            DictionaryCommand::RemoveWord(word) => flag(self.remove(word)),
            DictionaryCommand::Contains(word) => flag(self.contains(word)),
            DictionaryCommand::Leaf(ch) => self
                .random_containing(*ch, rng)
                .unwrap_or_default()
                .to_string(),
            DictionaryCommand::Stem(len) => self
                .random_of_length(*len, rng)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Answers datagrams on `socket` until it fails.
pub async fn serve(socket: UdpSocket, words: Arc<Mutex<WordList>>) -> io::Result<()> {
    info!(
        "Word service listening on {} with {} words",
        socket.local_addr()?,
        words.lock().await.len()
    );
    let mut buffer = [0u8; BUFFER_LIMIT];
    let mut rng = StdRng::from_entropy();

    loop {
        let (len, peer) = match socket.recv_from(&mut buffer).await {
            Ok(received) => received,
            Err(e) => {
                error!("Error receiving request: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            }
        };

        let request = String::from_utf8_lossy(&buffer[..len]).into_owned();
        let reply = match DictionaryCommand::parse(&request) {
            Ok(command) => words.lock().await.respond(&command, &mut rng),
            Err(e) => {
                warn!("Bad request {:?} from {}: {}", request, peer, e);
                REPLY_FALSE.to_string()
            }
        };
        debug!("{} -> {:?}", request, reply);

        if let Err(e) = socket.send_to(reply.as_bytes(), peer).await {
            error!("Failed to reply to {}: {}", peer, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryClient, WordSource, DEFAULT_TIMEOUT};

    #[test]
    fn test_add_and_remove() {
        let mut list = WordList::new(["oak"]);
        assert!(list.add("elm"));
        assert!(!list.add("oak"));
        assert!(list.remove("oak"));
        assert!(!list.remove("oak"));
        assert!(!list.contains("oak"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_words_players_cannot_type_are_refused() {
        let mut list = WordList::new(["oak", "co-op", "don't", "b52"]);
        assert_eq!(list.len(), 1);
        assert!(!list.add("x-ray"));
        assert!(!list.add(""));

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            list.respond(&DictionaryCommand::AddWord("r2d2".into()), &mut rng),
            "0"
        );
        assert!(!list.contains("r2d2"));
    }

    #[test]
    fn test_random_lookups_respect_constraints() {
        let list = WordList::new(["oak", "maple", "birch"]);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(list.random_of_length(5, &mut rng).map(str::len), Some(5));
            assert!(list.random_containing('r', &mut rng).unwrap().contains('r'));
        }
        assert!(list.random_of_length(0, &mut rng).is_some());
        assert_eq!(list.random_of_length(9, &mut rng), None);
        assert_eq!(list.random_containing('z', &mut rng), None);
    }

    #[test]
    fn test_respond_follows_protocol_replies() {
        let mut list = WordList::new(["oak"]);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(list.respond(&DictionaryCommand::Contains("oak".into()), &mut rng), "1");
        assert_eq!(list.respond(&DictionaryCommand::AddWord("oak".into()), &mut rng), "0");
        assert_eq!(list.respond(&DictionaryCommand::Stem(3), &mut rng), "oak");
        assert_eq!(list.respond(&DictionaryCommand::Leaf('x'), &mut rng), "");
    }

    #[tokio::test]
    async fn test_serves_dictionary_client() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let words = Arc::new(Mutex::new(WordList::new(["oak", "elm"])));
        tokio::spawn(serve(socket, Arc::clone(&words)));

        let client = DictionaryClient::new(addr, DEFAULT_TIMEOUT);
        assert!(client.is_word("oak").await.unwrap());
        assert!(client.add_word("yew").await.unwrap());
        assert!(words.lock().await.contains("yew"));
        assert_eq!(client.fetch_leaf('l').await.unwrap(), "elm");
        assert_eq!(client.request(DictionaryCommand::Stem(7)).await.unwrap(), "");
    }
}
