use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// One category as delivered by the puzzle generator, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    #[serde(rename = "category", alias = "name")]
    pub name: String,
    pub words: Vec<String>,
}

impl CategoryPayload {
    pub fn new<S: Into<String>>(name: impl Into<String>, words: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

/// Raw generator response: the categories plus the intended display order of all words.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub categories: Vec<CategoryPayload>,
    #[serde(default, rename = "shuffled_words", alias = "board")]
    pub board: Vec<String>,
}

impl PuzzlePayload {
    pub fn new(categories: Vec<CategoryPayload>, board: Vec<String>) -> Self {
        Self {
            theme: None,
            categories,
            board,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| PuzzleError::from(InvalidPuzzle::Malformed(err.to_string())))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    words: SmallVec<[Word; GROUP_SIZE]>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|member| member == word)
    }
}

/// A validated puzzle: four disjoint categories of four words and the current display order.
///
/// Serializes as a [`PuzzlePayload`] and deserializes through [`Puzzle::from_payload`], so a
/// deserialized puzzle upholds the same invariants as a loaded one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PuzzlePayload", into = "PuzzlePayload")]
pub struct Puzzle {
    theme: Option<String>,
    categories: Vec<Category>,
    board: Vec<Word>,
    word_index: HashMap<Word, CategoryIndex>,
}

impl Puzzle {
    pub fn from_payload(payload: PuzzlePayload) -> Result<Self> {
        let PuzzlePayload {
            theme,
            categories: raw_categories,
            board: raw_board,
        } = payload;

        if raw_categories.len() != CATEGORY_COUNT {
            return Err(InvalidPuzzle::CategoryCount {
                found: raw_categories.len(),
            }
            .into());
        }

        let mut categories = Vec::with_capacity(CATEGORY_COUNT);
        let mut word_index = HashMap::with_capacity(BOARD_SIZE);
        let mut seen_names = HashSet::with_capacity(CATEGORY_COUNT);

        for (index, raw) in raw_categories.into_iter().enumerate() {
            let name = normalize_label(&raw.name);
            if name.is_empty() {
                return Err(InvalidPuzzle::EmptyCategoryName { index }.into());
            }
            if !seen_names.insert(name.to_uppercase()) {
                return Err(InvalidPuzzle::DuplicateCategoryName(name).into());
            }

            if raw.words.len() != GROUP_SIZE {
                return Err(InvalidPuzzle::WordCount {
                    category: name,
                    found: raw.words.len(),
                }
                .into());
            }

            let words: SmallVec<[Word; GROUP_SIZE]> =
                raw.words.iter().map(|word| Word::normalize(word)).collect();
            if words.iter().any(Word::is_empty) {
                return Err(InvalidPuzzle::EmptyWord { category: name }.into());
            }

            let slot = index as CategoryIndex;
            for word in &words {
                if word_index.insert(word.clone(), slot).is_some() {
                    return Err(InvalidPuzzle::DuplicateWord(word.to_string()).into());
                }
            }

            categories.push(Category { name, words });
        }

        let board = if raw_board.is_empty() {
            categories
                .iter()
                .flat_map(|category| category.words.iter().cloned())
                .collect()
        } else {
            let board: Vec<Word> = raw_board.iter().map(|word| Word::normalize(word)).collect();
            let distinct = board.iter().collect::<HashSet<&Word>>().len();
            if board.len() != BOARD_SIZE
                || distinct != BOARD_SIZE
                || !board.iter().all(|word| word_index.contains_key(word))
            {
                return Err(InvalidPuzzle::BoardMismatch.into());
            }
            board
        };

        Ok(Self {
            theme,
            categories,
            board,
            word_index,
        })
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: CategoryIndex) -> Option<&Category> {
        self.categories.get(usize::from(index))
    }

    pub fn board(&self) -> &[Word] {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut [Word] {
        &mut self.board
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_index.contains_key(word)
    }

    pub fn category_of(&self, word: &str) -> Option<CategoryIndex> {
        self.word_index.get(word).copied()
    }

    /// Index of the category whose word set equals `selection`, if any.
    pub fn matching_category(&self, selection: &[Word]) -> Option<CategoryIndex> {
        if selection.len() != GROUP_SIZE {
            return None;
        }
        let index = self.category_of(selection.first()?.as_str())?;
        let category = self.category(index)?;
        category
            .words
            .iter()
            .all(|word| selection.contains(word))
            .then_some(index)
    }
}

impl TryFrom<PuzzlePayload> for Puzzle {
    type Error = PuzzleError;

    fn try_from(payload: PuzzlePayload) -> Result<Self> {
        Self::from_payload(payload)
    }
}

impl From<Puzzle> for PuzzlePayload {
    fn from(puzzle: Puzzle) -> Self {
        Self {
            theme: puzzle.theme,
            categories: puzzle
                .categories
                .into_iter()
                .map(|category| CategoryPayload {
                    name: category.name,
                    words: category.words.into_iter().map(Word::into_string).collect(),
                })
                .collect(),
            board: puzzle.board.into_iter().map(Word::into_string).collect(),
        }
    }
}
