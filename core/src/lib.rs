#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use puzzle::*;
pub use shuffle::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod puzzle;
mod shuffle;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub max_tries: u8,
}

impl RoundConfig {
    pub const fn new_unchecked(max_tries: u8) -> Self {
        Self { max_tries }
    }

    /// A round always allows at least one guess.
    pub fn new(max_tries: u8) -> Self {
        Self::new_unchecked(max_tries.max(1))
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_MAX_TRIES)
    }
}

/// Result of an operation that can only change or keep the round state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    NoChange,
    Changed,
}

impl ChangeOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of toggling a word, including the evaluation it may have triggered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    NoChange,
    Selected,
    Deselected,
    Matched(CategoryIndex),
    Missed,
    Won,
    Lost,
}

impl ToggleOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Whether this toggle completed a selection and spent a guess.
    pub const fn is_evaluation(self) -> bool {
        matches!(
            self,
            Self::Matched(_) | Self::Missed | Self::Won | Self::Lost
        )
    }
}

/// Feedback for the player after an evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundMessage {
    CategoryFound(String),
    NoMatch,
    Won,
    Lost,
}

impl fmt::Display for RoundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryFound(name) => write!(f, "Category found: {name}"),
            Self::NoMatch => f.write_str("No match, try again."),
            Self::Won => f.write_str("You matched all categories! You win!"),
            Self::Lost => f.write_str("Game over! No more tries left."),
        }
    }
}
