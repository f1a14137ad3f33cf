//! Game state: the running position, side to move, and committed history.
//!
//! History entries are single steps; a capture chain occupies one entry per
//! step, all by the same side. A chain still in progress is detected from the
//! tail of the history, which also reconstructs the running capture mask.

use crate::game_state::bit_board::BitBoard;
use crate::game_state::draughts_types::{Piece, PieceType, Side};
use crate::moves::draughts_move::Move;

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub bit_board: BitBoard,
    pub current_turn: Side,
    pub executed_moves: Vec<Move>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            bit_board: BitBoard::new(),
            current_turn: Side::White,
            executed_moves: Vec::new(),
        }
    }

    /// Commit one step. The stored copy drops its continuations; the turn
    /// only passes when the step had none left to play.
    pub fn execute_move(&mut self, mv: &Move) {
        let mut executed = mv.clone();
        executed.clear_follow_moves();

        self.bit_board = executed.target_bit_board;
        self.executed_moves.push(executed);

        if mv.follow_moves.is_empty() {
            self.current_turn = self.current_turn.opposite();
        }
    }

    /// Take back the opponent's whole last turn and the own turn before it,
    /// chains included. Does nothing until enough steps have been played.
    pub fn undo_last_move(&mut self) {
        if self.executed_moves.len() < 3 {
            return;
        }

        while self.last_step_side() == Some(self.current_turn.opposite()) {
            self.executed_moves.pop();
        }
        while self.last_step_side() == Some(self.current_turn) {
            self.executed_moves.pop();
        }

        self.bit_board = self
            .executed_moves
            .last()
            .map(|step| step.target_bit_board)
            .unwrap_or_else(BitBoard::new);
    }

    /// True while the side to move still has to finish its capture chain.
    pub fn in_move_combo(&self) -> bool {
        self.last_step_side() == Some(self.current_turn)
    }

    /// The piece that has to continue the chain, upgraded to a king when the
    /// last step promoted it. `None` outside a chain.
    pub fn move_combo_piece(&self) -> Option<Piece> {
        if !self.in_move_combo() {
            return None;
        }

        self.executed_moves.last().map(|last| {
            Piece::new(
                last.moving_piece.side,
                if last.promotion {
                    PieceType::King
                } else {
                    last.moving_piece.piece_type
                },
                last.target_position,
            )
        })
    }

    /// Mask of the squares jumped so far in the running chain; empty outside
    /// a chain. Every trailing same-side step is a capture.
    pub fn capture_bit_board(&self) -> u64 {
        self.executed_moves
            .iter()
            .rev()
            .take_while(|step| step.moving_piece.side == self.current_turn)
            .filter_map(|step| step.attacked_piece.as_ref())
            .fold(0, |mask, attacked| mask | (1u64 << attacked.position))
    }

    fn last_step_side(&self) -> Option<Side> {
        self.executed_moves.last().map(|step| step.moving_piece.side)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
