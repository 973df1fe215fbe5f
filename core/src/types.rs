use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of hidden categories in a puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in each category, and the size of a complete selection.
pub const GROUP_SIZE: usize = 4;

/// Number of words on the board.
pub const BOARD_SIZE: usize = CATEGORY_COUNT * GROUP_SIZE;

/// Incorrect guesses allowed per round unless configured otherwise.
pub const DEFAULT_MAX_TRIES: u8 = 4;

/// Slot of a category inside its puzzle, stable for the whole round.
pub type CategoryIndex = u8;

/// A board word in canonical comparison form.
///
/// Every constructor normalizes, so two words compare equal exactly when the
/// player would consider them the same tile.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Word(String);

impl Word {
    pub fn normalize(raw: &str) -> Self {
        Self(normalize_word(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Word {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Generators wrap words in list brackets and leave newlines behind; those are never part of a
/// word.
fn is_stray(ch: char) -> bool {
    matches!(ch, '[' | ']') || ch.is_control()
}

/// Drops stray delimiters and control characters, trims, and collapses inner whitespace runs to
/// a single space.
fn clean(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars().filter(|&ch| !is_stray(ch)) {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}

/// Canonical comparison form of a word: cleaned and upper-cased.
pub fn normalize_word(raw: &str) -> String {
    clean(raw).to_uppercase()
}

/// Display form of a category name: cleaned, with heading colons removed, case preserved.
pub fn normalize_label(raw: &str) -> String {
    let cleaned = clean(raw);
    let trimmed = cleaned.trim_matches(|ch: char| ch == ':' || ch.is_whitespace());
    String::from(trimmed)
}
