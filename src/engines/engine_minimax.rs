//! Alpha-beta minimax over chain-leaf child positions.
//!
//! Every possible move fans out into one child position per completion of
//! its capture chain, so the tree is built over boards rather than moves.
//! The search walks those positions depth-first under an alpha-beta window
//! and remembers which first-level child the principal variation runs
//! through; the matching root move is then narrowed to that path.

use log::{debug, warn};

use crate::engines::engine_random::random_move;
use crate::errors::{EngineError, EngineResult};
use crate::evaluation::evaluate_bit_board;
use crate::game_state::bit_board::BitBoard;
use crate::game_state::draughts_types::Side;
use crate::game_state::game_state::Game;
use crate::move_generation::legal_move_generator::{moves_for_game, moves_for_side};
use crate::moves::draughts_move::Move;

const ALPHA_START: i32 = -100;
const BETA_START: i32 = 100;

#[derive(Debug, Clone, Copy)]
struct SearchOutcome {
    evaluation_value: i32,
    /// Board of the first-level child the outcome was found behind. Fixed at
    /// the first recursion level and propagated unchanged below it.
    ancestor_move_bit_board: Option<BitBoard>,
}

/// The move leading toward the best reachable position at `depth`, its
/// continuations narrowed to the chosen chain. Falls back to a random legal
/// move when the searched position cannot be matched to a root move.
pub fn best_move(game: &Game, depth: u32) -> EngineResult<Move> {
    let outcome = build_and_evaluate(
        &game.bit_board,
        game.current_turn,
        depth,
        ALPHA_START,
        BETA_START,
        None,
    );
    debug!(
        "search at depth {} settled on evaluation {}",
        depth, outcome.evaluation_value
    );

    let possible_moves = moves_for_game(game);
    if possible_moves.is_empty() {
        return Err(EngineError::NoLegalMoves);
    }

    if let Some(ancestor_board) = outcome.ancestor_move_bit_board {
        for mv in &possible_moves {
            if mv.compare_follow_moves_to_bit_board(&ancestor_board) {
                let mut chosen = mv.clone();
                chosen.shrink_follow_moves_to_bit_board(&ancestor_board);
                return Ok(chosen);
            }
        }
    }

    warn!("no possible move reaches the searched position, falling back to a random move");
    random_move(game)
}

/// One child board per completion of the move's capture chain.
fn collect_chain_leaves(leaf_boards: &mut Vec<BitBoard>, mv: &Move) {
    if mv.follow_moves.is_empty() {
        leaf_boards.push(mv.target_bit_board);
    } else {
        for follow_move in &mv.follow_moves {
            collect_chain_leaves(leaf_boards, follow_move);
        }
    }
}

/// Expand and evaluate one node. Children are expanded lazily so that
/// subtrees behind an alpha-beta cutoff are never built.
fn build_and_evaluate(
    bit_board: &BitBoard,
    side: Side,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    ancestor_move_bit_board: Option<BitBoard>,
) -> SearchOutcome {
    if depth == 0 {
        return SearchOutcome {
            evaluation_value: evaluate_bit_board(bit_board),
            ancestor_move_bit_board,
        };
    }

    let possible_moves = moves_for_side(bit_board, side);
    if possible_moves.is_empty() {
        return SearchOutcome {
            evaluation_value: evaluate_bit_board(bit_board),
            ancestor_move_bit_board,
        };
    }

    let mut child_boards = Vec::new();
    for mv in &possible_moves {
        collect_chain_leaves(&mut child_boards, mv);
    }

    if side == Side::White {
        let mut maximum = SearchOutcome {
            evaluation_value: ALPHA_START,
            ancestor_move_bit_board: None,
        };

        for child_board in child_boards {
            let outcome = build_and_evaluate(
                &child_board,
                Side::Black,
                depth - 1,
                alpha,
                beta,
                ancestor_move_bit_board.or(Some(child_board)),
            );

            if outcome.evaluation_value > maximum.evaluation_value {
                maximum = outcome;
            }
            if outcome.evaluation_value > alpha {
                alpha = outcome.evaluation_value;
            }
            if beta <= alpha {
                break;
            }
        }

        maximum
    } else {
        let mut minimum = SearchOutcome {
            evaluation_value: BETA_START,
            ancestor_move_bit_board: None,
        };

        for child_board in child_boards {
            let outcome = build_and_evaluate(
                &child_board,
                Side::White,
                depth - 1,
                alpha,
                beta,
                ancestor_move_bit_board.or(Some(child_board)),
            );

            if outcome.evaluation_value < minimum.evaluation_value {
                minimum = outcome;
            }
            if outcome.evaluation_value < beta {
                beta = outcome.evaluation_value;
            }
            if beta <= alpha {
                break;
            }
        }

        minimum
    }
}
