//! Word sets and the crossword grid built from them.
//!
//! The stem runs down a single column. Every leaf runs across on the row
//! matching its stem index, shifted so that the character it shares with the
//! stem sits on the stem column:
//!
//! ```text
//! .ice      stem "cat" runs down column 2
//! ..a.      "ice" crosses it at stem[0] = 'c'
//! gate      "gate" crosses it at stem[2] = 't'
//! ```
//!
//! Cells are revealed per word slot. A cell is shown once any slot covering
//! it has been guessed.
//!
//! Only the words and the revealed flags are serialized. Deserializing
//! re-validates the leaves and rebuilds the layout, so a stored game can never
//! describe cells outside its own grid.

use serde::{Deserialize, Serialize};

/// Character drawn for a cell nothing occupies.
pub const EMPTY_CELL: char = '.';
/// Character drawn for a letter not yet revealed.
pub const HIDDEN_CELL: char = '-';

/// A word crossing the stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub word: String,
    /// Character position in the stem this leaf crosses.
    pub stem_index: usize,
    /// Character position in the leaf holding the shared character.
    pub crossing: usize,
}

/// A stem and the leaves crossing it. No two words are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WordSetRecord", into = "WordSetRecord")]
pub struct WordSet {
    stem: String,
    leaves: Vec<Leaf>,
}

impl WordSet {
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            leaves: Vec::new(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Number of words, stem included.
    pub fn len(&self) -> usize {
        1 + self.leaves.len()
    }

    /// Always false: a word set holds at least its stem.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, word: &str) -> bool {
        self.stem == word || self.leaves.iter().any(|leaf| leaf.word == word)
    }

    /// Words in order, stem first.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.stem.as_str()).chain(self.leaves.iter().map(|l| l.word.as_str()))
    }

    /// Character of the stem at `stem_index`.
    pub fn stem_char(&self, stem_index: usize) -> Option<char> {
        self.stem.chars().nth(stem_index)
    }

    /// Adds `word` as a leaf crossing the stem at `stem_index`.
    ///
    /// Returns false, leaving the set untouched, when the word is already in
    /// the set, the index is outside the stem, or the word does not contain
    /// the stem character at that index.
    pub fn add_leaf(&mut self, word: &str, stem_index: usize) -> bool {
        if self.contains(word) {
            return false;
        }
        let Some(shared) = self.stem_char(stem_index) else {
            return false;
        };
        let Some(crossing) = word.chars().position(|c| c == shared) else {
            return false;
        };

        self.leaves.push(Leaf {
            word: word.to_string(),
            stem_index,
            crossing,
        });
        true
    }
}

#[derive(Serialize, Deserialize)]
struct WordSetRecord {
    stem: String,
    leaves: Vec<Leaf>,
}

impl From<WordSet> for WordSetRecord {
    fn from(words: WordSet) -> Self {
        Self {
            stem: words.stem,
            leaves: words.leaves,
        }
    }
}

impl TryFrom<WordSetRecord> for WordSet {
    type Error = String;

    fn try_from(record: WordSetRecord) -> Result<Self, Self::Error> {
        let mut words = WordSet::new(record.stem);
        for leaf in record.leaves {
            if !words.add_leaf(&leaf.word, leaf.stem_index) {
                return Err(format!(
                    "leaf {:?} does not cross stem {:?} at {}",
                    leaf.word, words.stem, leaf.stem_index
                ));
            }
            if words.leaves.last().map(|l| l.crossing) != Some(leaf.crossing) {
                return Err(format!("leaf {:?} has crossing {}", leaf.word, leaf.crossing));
            }
        }
        Ok(words)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Across,
    Down,
}

/// Placement of one word on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    word: Vec<char>,
    row: usize,
    col: usize,
    direction: Direction,
    revealed: bool,
}

impl Slot {
    fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.word.iter().enumerate().map(move |(i, &ch)| match self.direction {
            Direction::Across => (self.row, self.col + i, ch),
            Direction::Down => (self.row + i, self.col, ch),
        })
    }

    fn matches(&self, guess: &str) -> bool {
        guess.chars().eq(self.word.iter().copied())
    }
}

/// Crossword grid for one game. Slot 0 is the stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleRecord", into = "PuzzleRecord")]
pub struct Puzzle {
    words: WordSet,
    slots: Vec<Slot>,
    width: usize,
    height: usize,
}

/// Stored form of a puzzle: the words and which of them are revealed,
/// stem first.
#[derive(Serialize, Deserialize)]
struct PuzzleRecord {
    words: WordSet,
    revealed: Vec<bool>,
}

impl From<Puzzle> for PuzzleRecord {
    fn from(puzzle: Puzzle) -> Self {
        Self {
            revealed: puzzle.slots.iter().map(|slot| slot.revealed).collect(),
            words: puzzle.words,
        }
    }
}

impl TryFrom<PuzzleRecord> for Puzzle {
    type Error = String;

    fn try_from(record: PuzzleRecord) -> Result<Self, Self::Error> {
        let mut puzzle = Puzzle::new(record.words);
        if record.revealed.len() != puzzle.slots.len() {
            return Err(format!(
                "{} revealed flags for {} words",
                record.revealed.len(),
                puzzle.slots.len()
            ));
        }
        for (slot, revealed) in puzzle.slots.iter_mut().zip(record.revealed) {
            slot.revealed = revealed;
        }
        Ok(puzzle)
    }
}

impl Puzzle {
    pub fn new(words: WordSet) -> Self {
        let stem_column = words.leaves.iter().map(|l| l.crossing).max().unwrap_or(0);
        let stem: Vec<char> = words.stem.chars().collect();

        let mut slots = Vec::with_capacity(words.len());
        let mut width = stem_column + 1;
        let height = stem.len().max(1);

        slots.push(Slot {
            word: stem,
            row: 0,
            col: stem_column,
            direction: Direction::Down,
            revealed: false,
        });

        for leaf in &words.leaves {
            let chars: Vec<char> = leaf.word.chars().collect();
            let col = stem_column - leaf.crossing;
            width = width.max(col + chars.len());
            slots.push(Slot {
                word: chars,
                row: leaf.stem_index,
                col,
                direction: Direction::Across,
                revealed: false,
            });
        }

        Self {
            words,
            slots,
            width,
            height,
        }
    }

    pub fn word_set(&self) -> &WordSet {
        &self.words
    }

    /// Reveals the unrevealed word equal to `guess`. Returns whether one
    /// matched; guessing an already revealed word does not match.
    pub fn guess(&mut self, guess: &str) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|slot| !slot.revealed && slot.matches(guess))
        {
            Some(slot) => {
                slot.revealed = true;
                true
            }
            None => false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.slots.iter().all(|slot| slot.revealed)
    }

    /// Number of words still hidden.
    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.revealed).count()
    }

    pub fn is_revealed(&self, word: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.revealed && slot.matches(word))
    }

    /// Draws the grid, one text row per grid row.
    pub fn render(&self) -> String {
        let mut cells = vec![vec![EMPTY_CELL; self.width]; self.height];

        for slot in &self.slots {
            for (row, col, ch) in slot.cells() {
                let cell = &mut cells[row][col];
                if slot.revealed {
                    *cell = ch;
                } else if *cell == EMPTY_CELL {
                    *cell = HIDDEN_CELL;
                }
            }
        }

        let mut out = String::with_capacity(self.height * (self.width + 1));
        for row in cells {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
