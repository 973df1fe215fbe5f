use alloc::string::ToString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Empty -> InProgress (load)
/// - InProgress -> InProgress (load, evaluation)
/// - InProgress -> Won
/// - InProgress -> Lost
/// - any -> Empty (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No puzzle loaded
    Empty,
    InProgress,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Empty
    }
}

/// Mutable state of one round, only changed through [`PuzzleEngine`] operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    selected: SmallVec<[Word; GROUP_SIZE]>,
    found: SmallVec<[CategoryIndex; CATEGORY_COUNT]>,
    tries_remaining: u8,
    state: EngineState,
    message: Option<RoundMessage>,
    guess_count: u16,
}

impl RoundState {
    fn new(config: RoundConfig, state: EngineState) -> Self {
        Self {
            selected: SmallVec::new(),
            found: SmallVec::new(),
            tries_remaining: config.max_tries.max(1),
            state,
            message: None,
            guess_count: 0,
        }
    }

    pub fn selected(&self) -> &[Word] {
        &self.selected
    }

    /// Solved categories in discovery order.
    pub fn found(&self) -> &[CategoryIndex] {
        &self.found
    }

    pub fn tries_remaining(&self) -> u8 {
        self.tries_remaining
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn message(&self) -> Option<&RoundMessage> {
        self.message.as_ref()
    }

    /// Evaluated guesses this round, correct or not.
    pub fn guess_count(&self) -> u16 {
        self.guess_count
    }

    pub fn is_selected(&self, word: &str) -> bool {
        self.selected.iter().any(|selected| selected == word)
    }

    pub fn is_found(&self, index: CategoryIndex) -> bool {
        self.found.contains(&index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleEngine {
    config: RoundConfig,
    puzzle: Option<Puzzle>,
    round: RoundState,
    shuffler: RandomShuffler,
}

impl PuzzleEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_config(RoundConfig::default(), seed)
    }

    pub fn with_config(config: RoundConfig, seed: u64) -> Self {
        let config = RoundConfig::new(config.max_tries);
        Self {
            config,
            puzzle: None,
            round: RoundState::new(config, EngineState::Empty),
            shuffler: RandomShuffler::new(seed),
        }
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn state(&self) -> EngineState {
        self.round.state
    }

    pub fn is_finished(&self) -> bool {
        self.round.state.is_finished()
    }

    pub fn max_tries(&self) -> u8 {
        self.config.max_tries
    }

    pub fn tries_remaining(&self) -> u8 {
        self.round.tries_remaining
    }

    pub fn selected(&self) -> &[Word] {
        self.round.selected()
    }

    pub fn found(&self) -> &[CategoryIndex] {
        self.round.found()
    }

    pub fn found_categories(&self) -> impl Iterator<Item = &Category> {
        self.round
            .found
            .iter()
            .filter_map(|&index| self.puzzle.as_ref()?.category(index))
    }

    /// Categories the player has not solved, in puzzle order.
    pub fn unsolved_categories(&self) -> impl Iterator<Item = (CategoryIndex, &Category)> {
        self.categories()
            .iter()
            .enumerate()
            .map(|(index, category)| (index as CategoryIndex, category))
            .filter(|(index, _)| !self.round.is_found(*index))
    }

    pub fn message(&self) -> Option<&RoundMessage> {
        self.round.message()
    }

    pub fn guess_count(&self) -> u16 {
        self.round.guess_count
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn board(&self) -> &[Word] {
        self.puzzle.as_ref().map(Puzzle::board).unwrap_or_default()
    }

    pub fn categories(&self) -> &[Category] {
        self.puzzle
            .as_ref()
            .map(Puzzle::categories)
            .unwrap_or_default()
    }

    pub fn word_status(&self, word: &str) -> Option<TileStatus> {
        let word = Word::normalize(word);
        let index = self.puzzle.as_ref()?.category_of(word.as_str())?;
        Some(if self.round.is_found(index) {
            TileStatus::Found
        } else if self.round.is_selected(word.as_str()) {
            TileStatus::Selected
        } else {
            TileStatus::Available
        })
    }

    /// Validates `payload` and starts a fresh round with it. A payload without a display order
    /// gets its board shuffled. On error the current puzzle and round are kept as they were.
    pub fn load_puzzle(&mut self, payload: PuzzlePayload) -> Result<()> {
        let grouped = payload.board.is_empty();
        let puzzle = Puzzle::from_payload(payload).inspect_err(|err| {
            log::warn!("Rejected puzzle payload: {err}");
        })?;
        self.load(puzzle);
        if grouped {
            self.shuffle_board();
        }
        Ok(())
    }

    pub fn load(&mut self, puzzle: Puzzle) {
        log::debug!(
            "Loaded puzzle {:?} with categories {:?}",
            puzzle.theme(),
            puzzle.categories().iter().map(Category::name).collect::<alloc::vec::Vec<_>>()
        );
        self.puzzle = Some(puzzle);
        self.round = RoundState::new(self.config, EngineState::InProgress);
    }

    /// Selects or deselects a board word. Completing a selection evaluates it before returning.
    pub fn toggle_word(&mut self, word: &str) -> Result<ToggleOutcome> {
        use ToggleOutcome::*;

        let word = Word::normalize(word);
        let category = self
            .puzzle
            .as_ref()
            .and_then(|puzzle| puzzle.category_of(word.as_str()))
            .ok_or_else(|| PuzzleError::UnknownWord(word.to_string()))?;

        if self.round.state.is_finished() || self.round.is_found(category) {
            return Ok(NoChange);
        }

        if let Some(pos) = self.round.selected.iter().position(|selected| *selected == word) {
            self.round.selected.remove(pos);
            log::trace!("Deselected {word}");
            return Ok(Deselected);
        }

        if self.round.selected.len() >= GROUP_SIZE {
            return Ok(NoChange);
        }

        log::trace!("Selected {word}");
        self.round.selected.push(word);

        Ok(if self.round.selected.len() == GROUP_SIZE {
            self.evaluate_selection()
        } else {
            Selected
        })
    }

    pub fn unselect_all(&mut self) -> ChangeOutcome {
        if self.round.state.is_finished() || self.round.selected.is_empty() {
            return ChangeOutcome::NoChange;
        }
        self.round.selected.clear();
        ChangeOutcome::Changed
    }

    pub fn shuffle_board(&mut self) -> ChangeOutcome {
        Self::shuffle_with(self.puzzle.as_mut(), self.round.state, &mut self.shuffler)
    }

    /// Same as [`Self::shuffle_board`] with a caller-provided strategy.
    pub fn shuffle_board_with(&mut self, shuffler: &mut impl BoardShuffler) -> ChangeOutcome {
        Self::shuffle_with(self.puzzle.as_mut(), self.round.state, shuffler)
    }

    /// Drops the puzzle and returns to the state before anything was loaded.
    pub fn reset_round(&mut self) {
        log::debug!("Round reset");
        self.puzzle = None;
        self.round = RoundState::new(self.config, EngineState::Empty);
    }

    fn shuffle_with(
        puzzle: Option<&mut Puzzle>,
        state: EngineState,
        shuffler: &mut impl BoardShuffler,
    ) -> ChangeOutcome {
        match puzzle {
            Some(puzzle) if !state.is_finished() && !puzzle.board().is_empty() => {
                shuffler.shuffle(puzzle.board_mut());
                ChangeOutcome::Changed
            }
            _ => ChangeOutcome::NoChange,
        }
    }

    fn evaluate_selection(&mut self) -> ToggleOutcome {
        let Some(puzzle) = self.puzzle.as_ref() else {
            return ToggleOutcome::NoChange;
        };
        let round = &mut self.round;
        round.guess_count = round.guess_count.saturating_add(1);

        let outcome = match puzzle.matching_category(&round.selected) {
            Some(index) => {
                if !round.found.contains(&index) {
                    round.found.push(index);
                }
                let name = puzzle.category(index).map(Category::name).unwrap_or_default();
                log::debug!("Selection {:?} matched {name:?}", round.selected);
                round.message = Some(RoundMessage::CategoryFound(name.to_string()));
                ToggleOutcome::Matched(index)
            }
            None => {
                round.tries_remaining = round.tries_remaining.saturating_sub(1);
                log::debug!(
                    "Selection {:?} missed, {} tries left",
                    round.selected,
                    round.tries_remaining
                );
                round.message = Some(RoundMessage::NoMatch);
                ToggleOutcome::Missed
            }
        };
        round.selected.clear();

        if round.found.len() == CATEGORY_COUNT {
            round.state = EngineState::Won;
            round.message = Some(RoundMessage::Won);
            ToggleOutcome::Won
        } else if round.tries_remaining == 0 {
            round.state = EngineState::Lost;
            round.message = Some(RoundMessage::Lost);
            ToggleOutcome::Lost
        } else {
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn grouped_payload() -> PuzzlePayload {
        PuzzlePayload::new(
            vec![
                CategoryPayload::new("Fruit", ["apple", "pear", "grape", "lime"]),
                CategoryPayload::new("Color", ["red", "blue", "green", "pink"]),
                CategoryPayload::new("Pet", ["dog", "cat", "fish", "bird"]),
                CategoryPayload::new("Tool", ["saw", "drill", "hammer", "file"]),
            ],
            vec![],
        )
    }

    /// Same puzzle, displayed in category order.
    fn payload() -> PuzzlePayload {
        let mut payload = grouped_payload();
        payload.board = payload
            .categories
            .iter()
            .flat_map(|category| category.words.iter().cloned())
            .collect();
        payload
    }

    fn engine() -> PuzzleEngine {
        let mut engine = PuzzleEngine::new(1);
        engine.load_puzzle(payload()).unwrap();
        engine
    }

    fn toggle_all(engine: &mut PuzzleEngine, words: &[&str]) -> Vec<ToggleOutcome> {
        words.iter().map(|word| engine.toggle_word(word).unwrap()).collect()
    }

    #[test]
    fn new_engine_starts_empty() {
        let engine = PuzzleEngine::new(0);

        assert_eq!(engine.state(), EngineState::Empty);
        assert!(engine.board().is_empty());
        assert!(engine.categories().is_empty());
        assert_eq!(engine.tries_remaining(), DEFAULT_MAX_TRIES);
    }

    #[test]
    fn toggle_without_puzzle_is_unknown_word() {
        let mut engine = PuzzleEngine::new(0);

        assert_eq!(
            engine.toggle_word("apple"),
            Err(PuzzleError::UnknownWord("APPLE".into()))
        );
    }

    #[test]
    fn toggle_selects_and_deselects() {
        let mut engine = engine();

        assert_eq!(engine.toggle_word("apple").unwrap(), ToggleOutcome::Selected);
        assert_eq!(engine.toggle_word("RED").unwrap(), ToggleOutcome::Selected);
        assert_eq!(engine.selected(), ["APPLE", "RED"]);

        assert_eq!(engine.toggle_word(" Apple ").unwrap(), ToggleOutcome::Deselected);
        assert_eq!(engine.selected(), ["RED"]);
        assert_eq!(engine.word_status("red"), Some(TileStatus::Selected));
        assert_eq!(engine.word_status("apple"), Some(TileStatus::Available));
    }

    #[test]
    fn fourth_word_triggers_evaluation() {
        let mut engine = engine();

        let outcomes = toggle_all(&mut engine, &["pear", "lime", "apple", "grape"]);

        assert_eq!(outcomes[3], ToggleOutcome::Matched(0));
        assert!(engine.selected().is_empty());
        assert_eq!(engine.found(), [0]);
        assert_eq!(engine.tries_remaining(), 4);
        assert_eq!(engine.guess_count(), 1);
        assert_eq!(
            engine.message(),
            Some(&RoundMessage::CategoryFound("Fruit".into()))
        );
        assert_eq!(engine.word_status("grape"), Some(TileStatus::Found));
    }

    #[test]
    fn found_words_cannot_be_selected_again() {
        let mut engine = engine();
        toggle_all(&mut engine, &["apple", "pear", "grape", "lime"]);

        assert_eq!(engine.toggle_word("apple").unwrap(), ToggleOutcome::NoChange);
        assert!(engine.selected().is_empty());
    }

    #[test]
    fn miss_costs_a_try_and_clears_selection() {
        let mut engine = engine();

        let outcomes = toggle_all(&mut engine, &["red", "blue", "green", "apple"]);

        assert_eq!(outcomes[3], ToggleOutcome::Missed);
        assert_eq!(engine.tries_remaining(), 3);
        assert!(engine.found().is_empty());
        assert!(engine.selected().is_empty());
        assert_eq!(engine.message(), Some(&RoundMessage::NoMatch));
    }

    #[test]
    fn running_out_of_tries_loses() {
        let mut engine = engine();

        for _ in 0..3 {
            let outcomes = toggle_all(&mut engine, &["red", "blue", "green", "apple"]);
            assert_eq!(outcomes[3], ToggleOutcome::Missed);
        }
        let outcomes = toggle_all(&mut engine, &["red", "blue", "green", "apple"]);

        assert_eq!(outcomes[3], ToggleOutcome::Lost);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.tries_remaining(), 0);
        assert_eq!(engine.message(), Some(&RoundMessage::Lost));
        assert_eq!(engine.unsolved_categories().count(), 4);
    }

    #[test]
    fn finished_round_ignores_toggles_and_clears() {
        let mut engine = PuzzleEngine::with_config(RoundConfig::new(1), 0);
        engine.load_puzzle(payload()).unwrap();
        toggle_all(&mut engine, &["red", "blue", "green", "apple"]);
        assert!(engine.is_finished());

        assert_eq!(engine.toggle_word("dog").unwrap(), ToggleOutcome::NoChange);
        assert_eq!(engine.unselect_all(), ChangeOutcome::NoChange);
        assert_eq!(engine.shuffle_board(), ChangeOutcome::NoChange);
        assert!(engine.selected().is_empty());
        assert_eq!(engine.toggle_word("unicorn"), Err(PuzzleError::UnknownWord("UNICORN".into())));
    }

    #[test]
    fn solving_every_category_wins() {
        let mut engine = engine();
        toggle_all(&mut engine, &["red", "blue", "green", "apple"]);

        toggle_all(&mut engine, &["apple", "pear", "grape", "lime"]);
        toggle_all(&mut engine, &["red", "blue", "green", "pink"]);
        toggle_all(&mut engine, &["dog", "cat", "fish", "bird"]);
        let outcomes = toggle_all(&mut engine, &["saw", "drill", "hammer", "file"]);

        assert_eq!(outcomes[3], ToggleOutcome::Won);
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.tries_remaining(), 3);
        assert_eq!(engine.found(), [0, 1, 2, 3]);
        assert_eq!(engine.unsolved_categories().count(), 0);
        assert_eq!(engine.guess_count(), 5);
    }

    #[test]
    fn unselect_all_clears_selection() {
        let mut engine = engine();
        toggle_all(&mut engine, &["red", "dog"]);

        assert_eq!(engine.unselect_all(), ChangeOutcome::Changed);
        assert_eq!(engine.unselect_all(), ChangeOutcome::NoChange);
        assert!(engine.selected().is_empty());
        assert_eq!(engine.tries_remaining(), 4);
    }

    #[test]
    fn rejected_payload_keeps_current_round() {
        let mut engine = engine();
        toggle_all(&mut engine, &["red", "dog"]);
        let before = engine.clone();

        let mut broken = payload();
        broken.categories[0].words.pop();

        assert!(matches!(
            engine.load_puzzle(broken),
            Err(PuzzleError::InvalidPuzzle(InvalidPuzzle::WordCount { .. }))
        ));
        assert_eq!(engine, before);
    }

    #[test]
    fn load_shuffles_payload_without_display_order() {
        let grouped: Vec<Word> = payload().board.iter().map(|word| Word::normalize(word)).collect();
        let mut grouped_rows = 0;

        for seed in 0..32 {
            let mut engine = PuzzleEngine::new(seed);
            engine.load_puzzle(grouped_payload()).unwrap();
            let puzzle = engine.puzzle().unwrap();

            assert_ne!(engine.board(), grouped.as_slice());
            assert_eq!(engine.state(), EngineState::InProgress);
            assert!(engine.selected().is_empty());
            if puzzle.matching_category(&engine.board()[..GROUP_SIZE]).is_some() {
                grouped_rows += 1;
            }
        }

        // a random board opens with a whole category well under 1% of the time
        assert!(grouped_rows < 4, "{grouped_rows} of 32 boards opened with a category");
    }

    #[test]
    fn load_keeps_given_display_order() {
        let engine = engine();

        assert_eq!(engine.board()[0], "APPLE");
        assert_eq!(engine.board()[15], "FILE");
    }

    #[test]
    fn shuffle_keeps_selection_and_found() {
        let mut engine = engine();
        toggle_all(&mut engine, &["apple", "pear", "grape", "lime"]);
        toggle_all(&mut engine, &["red"]);
        let mut before: Vec<Word> = engine.board().to_vec();

        assert_eq!(engine.shuffle_board(), ChangeOutcome::Changed);

        let mut after: Vec<Word> = engine.board().to_vec();
        assert_ne!(after, before);
        before.sort();
        after.sort();
        assert_eq!(after, before);
        assert_eq!(engine.selected(), ["RED"]);
        assert_eq!(engine.found(), [0]);
    }

    #[test]
    fn shuffle_accepts_custom_strategy() {
        struct Reverse;

        impl BoardShuffler for Reverse {
            fn shuffle(&mut self, board: &mut [Word]) {
                board.reverse();
            }
        }

        let mut engine = engine();
        assert_eq!(engine.shuffle_board_with(&mut Reverse), ChangeOutcome::Changed);
        assert_eq!(engine.board()[0], "FILE");

        engine.reset_round();
        assert_eq!(engine.shuffle_board_with(&mut Reverse), ChangeOutcome::NoChange);
    }

    #[test]
    fn reset_returns_to_empty_state() {
        let mut engine = engine();
        toggle_all(&mut engine, &["red", "blue", "green", "apple"]);

        engine.reset_round();

        assert_eq!(engine.state(), EngineState::Empty);
        assert!(engine.puzzle().is_none());
        assert!(engine.board().is_empty());
        assert_eq!(engine.tries_remaining(), 4);
        assert_eq!(engine.message(), None);
        assert_eq!(engine, {
            let mut fresh = PuzzleEngine::new(1);
            fresh.shuffler = engine.shuffler.clone();
            fresh
        });
    }

    #[test]
    fn loading_replaces_finished_round() {
        let mut engine = PuzzleEngine::with_config(RoundConfig::new(1), 0);
        engine.load_puzzle(payload()).unwrap();
        toggle_all(&mut engine, &["red", "blue", "green", "apple"]);
        assert_eq!(engine.state(), EngineState::Lost);

        engine.load_puzzle(payload()).unwrap();

        assert_eq!(engine.state(), EngineState::InProgress);
        assert_eq!(engine.tries_remaining(), 1);
        assert!(engine.found().is_empty());
        assert_eq!(engine.guess_count(), 0);
    }
}
