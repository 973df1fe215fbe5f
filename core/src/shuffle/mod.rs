use crate::*;
pub use random::*;

mod random;

/// Reorders the board in place without adding or removing words.
pub trait BoardShuffler {
    fn shuffle(&mut self, board: &mut [Word]);
}
