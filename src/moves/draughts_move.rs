//! Single-step move records and their continuation trees.
//!
//! A `Move` captures one slide or one jump: the identity of the mover, the
//! board before the step, and the board derived after it. Jump moves own the
//! legal ways to extend the chain as `follow_moves`; the generator attaches
//! them and the selection helpers narrow them to a single path.

use rand::Rng;

use crate::game_state::bit_board::BitBoard;
use crate::game_state::draughts_types::{Piece, PieceType, Side, Square};
use crate::utils::notation::square_label;

#[derive(Debug, Clone)]
pub struct Move {
    pub moving_piece: Piece,
    pub target_position: Square,
    pub attacked_piece: Option<Piece>,
    pub promotion: bool,
    pub source_bit_board: BitBoard,
    pub target_bit_board: BitBoard,
    pub follow_moves: Vec<Move>,
}

impl PartialEq for Move {
    // Two moves are the same step when they connect the same two boards.
    fn eq(&self, other: &Self) -> bool {
        self.source_bit_board == other.source_bit_board
            && self.target_bit_board == other.target_bit_board
    }
}

impl Move {
    /// Build a step and derive its post-step board: the mover leaves its
    /// square, a jumped piece leaves the board, and the mover lands on the
    /// target as a king when it was one already or promotes on this step.
    pub fn new(
        moving_piece: Piece,
        target_position: Square,
        attacked_piece: Option<Piece>,
        promotion: bool,
        source_bit_board: BitBoard,
    ) -> Self {
        let mut target_bit_board = source_bit_board;

        let cleared_source = !(1u64 << moving_piece.position);
        target_bit_board.white_men &= cleared_source;
        target_bit_board.white_kings &= cleared_source;
        target_bit_board.black_men &= cleared_source;
        target_bit_board.black_kings &= cleared_source;

        if let Some(attacked) = &attacked_piece {
            let cleared_attacked = !(1u64 << attacked.position);
            target_bit_board.white_men &= cleared_attacked;
            target_bit_board.white_kings &= cleared_attacked;
            target_bit_board.black_men &= cleared_attacked;
            target_bit_board.black_kings &= cleared_attacked;
        }

        let landing = 1u64 << target_position;
        let lands_as_king = promotion || moving_piece.piece_type == PieceType::King;
        match (moving_piece.side, lands_as_king) {
            (Side::White, true) => target_bit_board.white_kings |= landing,
            (Side::White, false) => target_bit_board.white_men |= landing,
            (Side::Black, true) => target_bit_board.black_kings |= landing,
            (Side::Black, false) => target_bit_board.black_men |= landing,
        }

        Self {
            moving_piece,
            target_position,
            attacked_piece,
            promotion,
            source_bit_board,
            target_bit_board,
            follow_moves: Vec::new(),
        }
    }

    pub fn add_follow_move(&mut self, follow_move: Move) {
        self.follow_moves.push(follow_move);
    }

    pub fn clear_follow_moves(&mut self) {
        self.follow_moves.clear();
    }

    /// True when some completion of this step's chain ends in `bit_board`.
    pub fn compare_follow_moves_to_bit_board(&self, bit_board: &BitBoard) -> bool {
        if self.follow_moves.is_empty() {
            self.target_bit_board == *bit_board
        } else {
            self.follow_moves
                .iter()
                .any(|follow_move| follow_move.compare_follow_moves_to_bit_board(bit_board))
        }
    }

    /// Keep only the continuations whose chains can still reach `bit_board`.
    pub fn shrink_follow_moves_to_bit_board(&mut self, bit_board: &BitBoard) {
        if self.follow_moves.is_empty() {
            return;
        }

        self.follow_moves
            .retain(|follow_move| follow_move.compare_follow_moves_to_bit_board(bit_board));

        for follow_move in &mut self.follow_moves {
            follow_move.shrink_follow_moves_to_bit_board(bit_board);
        }
    }

    /// Narrow the chain to one uniformly sampled path.
    pub fn shrink_follow_moves_randomly(&mut self) {
        if self.follow_moves.is_empty() {
            return;
        }

        let kept = rand::rng().random_range(0..self.follow_moves.len());
        self.follow_moves.swap(0, kept);
        self.follow_moves.truncate(1);

        self.follow_moves[0].shrink_follow_moves_randomly();
    }

    /// Field notation for this single step: source, jumped square if any,
    /// target, joined with "-" (for example "F3-G4-H5").
    pub fn description(&self) -> String {
        let mut description = square_label(self.moving_piece.position);

        if let Some(attacked) = &self.attacked_piece {
            description.push('-');
            description.push_str(&square_label(attacked.position));
        }

        description.push('-');
        description.push_str(&square_label(self.target_position));

        description
    }
}
