use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(#[from] InvalidPuzzle),
    #[error("Word {0:?} is not on the board")]
    UnknownWord(String),
}

/// Reason a payload was rejected by [`Puzzle::from_payload`](crate::Puzzle::from_payload).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPuzzle {
    #[error("expected 4 categories, found {found}")]
    CategoryCount { found: usize },
    #[error("category {category:?} must have 4 words, found {found}")]
    WordCount { category: String, found: usize },
    #[error("category {category:?} contains an empty word")]
    EmptyWord { category: String },
    #[error("category #{index} has an empty name")]
    EmptyCategoryName { index: usize },
    #[error("category name {0:?} is used more than once")]
    DuplicateCategoryName(String),
    #[error("word {0:?} appears more than once")]
    DuplicateWord(String),
    #[error("display order is not a permutation of the category words")]
    BoardMismatch,
    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T> = core::result::Result<T, PuzzleError>;
