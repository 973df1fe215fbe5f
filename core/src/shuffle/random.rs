use serde::{Deserialize, Serialize};

use super::*;

/// Uniform shuffle strategy backed by a seeded small RNG.
///
/// Each call re-seeds from the previous run, so consecutive shuffles of the same board produce
/// different orders while a given starting seed always yields the same sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomShuffler {
    seed: u64,
}

impl RandomShuffler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardShuffler for RandomShuffler {
    fn shuffle(&mut self, board: &mut [Word]) {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        board.shuffle(&mut rng);
        self.seed = rng.random();
        log::trace!("Shuffled {} words, next seed: {}", board.len(), self.seed);
    }
}
