use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileStatus {
    Available,
    Selected,
    Found,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub word: Word,
    pub category: CategoryIndex,
    pub status: TileStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub index: CategoryIndex,
    pub name: String,
    pub words: Vec<Word>,
}

impl CategoryView {
    fn new(index: CategoryIndex, category: &Category) -> Self {
        Self {
            index,
            name: category.name().into(),
            words: category.words().to_vec(),
        }
    }
}

/// Read-only picture of the round, enough to draw the grid, the solved rows and the end-of-round
/// banner.
///
/// Every tile carries its category slot so presentation layers can colour found rows, and the
/// whole board once the round is over, without asking the engine again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub theme: Option<String>,
    pub tiles: Vec<TileView>,
    pub found: Vec<CategoryView>,
    /// Only filled in once the round is finished.
    pub unsolved: Vec<CategoryView>,
    pub tries_remaining: u8,
    pub max_tries: u8,
    pub state: EngineState,
    pub message: Option<String>,
}

impl RoundView {
    pub fn from_engine(engine: &PuzzleEngine) -> Self {
        let round = engine.round();
        let puzzle = engine.puzzle();

        let tiles: Vec<TileView> = puzzle
            .map(|puzzle| {
                puzzle
                    .board()
                    .iter()
                    .filter_map(|word| {
                        let category = puzzle.category_of(word.as_str())?;
                        let status = if round.is_found(category) {
                            TileStatus::Found
                        } else if round.is_selected(word.as_str()) {
                            TileStatus::Selected
                        } else {
                            TileStatus::Available
                        };
                        Some(TileView {
                            word: word.clone(),
                            category,
                            status,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let found: Vec<CategoryView> = round
            .found()
            .iter()
            .filter_map(|&index| Some(CategoryView::new(index, puzzle?.category(index)?)))
            .collect();

        let unsolved = if round.state().is_finished() {
            engine
                .unsolved_categories()
                .map(|(index, category)| CategoryView::new(index, category))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            theme: puzzle.and_then(Puzzle::theme).map(String::from),
            tiles,
            found,
            unsolved,
            tries_remaining: round.tries_remaining(),
            max_tries: engine.max_tries(),
            state: round.state(),
            message: round.message().map(alloc::string::ToString::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.status == TileStatus::Selected)
            .count()
    }

    /// Tiles not yet part of a solved category, in board order.
    pub fn open_tiles(&self) -> impl Iterator<Item = &TileView> {
        self.tiles
            .iter()
            .filter(|tile| tile.status != TileStatus::Found)
    }
}
