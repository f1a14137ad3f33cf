//! Uniformly random legal move selection.
//!
//! Used as the search's fallback and as a baseline opponent. The generator is
//! freshly seeded from the operating system on every call.

use rand::prelude::IndexedRandom;

use crate::errors::{EngineError, EngineResult};
use crate::game_state::game_state::Game;
use crate::move_generation::legal_move_generator::moves_for_game;
use crate::moves::draughts_move::Move;

/// A uniformly random legal move, its capture chain narrowed to a single
/// uniformly sampled path.
pub fn random_move(game: &Game) -> EngineResult<Move> {
    let possible_moves = moves_for_game(game);

    let mut rng = rand::rng();
    let mut chosen = possible_moves
        .choose(&mut rng)
        .ok_or(EngineError::NoLegalMoves)?
        .clone();
    chosen.shrink_follow_moves_randomly();

    Ok(chosen)
}
