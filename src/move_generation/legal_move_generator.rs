//! Bit-parallel legal move generation with mandatory captures.
//!
//! Candidate pieces move as whole masks: clear the direction's wall, shift,
//! mask out illegal landings, then iterate the surviving bits into `Move`
//! records. Jump generation runs in two phases per direction (walking up to
//! the first enemy piece, then landing past it) and recursively attaches
//! every forced continuation to the emitted capture.

use crate::game_state::bit_board::BitBoard;
use crate::game_state::draughts_types::{Piece, PieceType, Side, Square};
use crate::game_state::game_state::Game;
use crate::move_generation::move_directions::{promotes_on, MoveDirection, DIRECTIONS};
use crate::moves::draughts_move::Move;

/// Legal moves for the game's side to move. While a capture chain is in
/// progress only the chain piece's continuations are legal.
pub fn moves_for_game(game: &Game) -> Vec<Move> {
    match game.move_combo_piece() {
        Some(combo_piece) => {
            moves_for_piece(&game.bit_board, &combo_piece, game.capture_bit_board())
        }
        None => moves_for_side(&game.bit_board, game.current_turn),
    }
}

/// All legal root moves for `side`. Jumping is obligatory: slides are only
/// offered when no capture exists anywhere on the board.
pub fn moves_for_side(bit_board: &BitBoard, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();

    for piece_type in [PieceType::Man, PieceType::King] {
        for direction in &DIRECTIONS {
            let candidates = bit_board.pieces_of(side, piece_type);
            advance_before_enemy(
                &mut moves,
                bit_board,
                side,
                piece_type,
                direction,
                0,
                candidates,
                1,
            );
        }
    }

    if !moves.is_empty() {
        return moves;
    }

    for direction in &DIRECTIONS {
        // Men slide only away from their own back rank; kings go anywhere.
        if man_slides_toward(side, direction) {
            let men = bit_board.pieces_of(side, PieceType::Man);
            slide_mask(&mut moves, bit_board, side, PieceType::Man, direction, men, 1);
        }
        let kings = bit_board.pieces_of(side, PieceType::King);
        slide_mask(&mut moves, bit_board, side, PieceType::King, direction, kings, 1);
    }

    moves
}

/// Capture continuations for a single piece, with the squares in
/// `capture_mask` already jumped earlier in the turn.
pub fn moves_for_piece(bit_board: &BitBoard, piece: &Piece, capture_mask: u64) -> Vec<Move> {
    let mut moves = Vec::new();

    for direction in &DIRECTIONS {
        advance_before_enemy(
            &mut moves,
            bit_board,
            piece.side,
            piece.piece_type,
            direction,
            capture_mask,
            1u64 << piece.position,
            1,
        );
    }

    moves
}

fn man_slides_toward(side: Side, direction: &MoveDirection) -> bool {
    match side {
        Side::White => direction.shift > 0,
        Side::Black => direction.shift < 0,
    }
}

/// Emit the slides reachable by shifting `move_mask` once more. Kings keep
/// sliding along the diagonal, so their surviving mask recurses with an
/// incremented step count.
fn slide_mask(
    moves: &mut Vec<Move>,
    bit_board: &BitBoard,
    side: Side,
    piece_type: PieceType,
    direction: &MoveDirection,
    mut move_mask: u64,
    move_count: i32,
) {
    move_mask &= !direction.slide_wall;
    move_mask = direction.shift_bits(move_mask);
    move_mask &= !bit_board.blocking();

    if move_mask == 0 {
        return;
    }

    let mut targets = move_mask;
    while targets != 0 {
        let target = targets.trailing_zeros() as Square;
        moves.push(Move::new(
            Piece::new(side, piece_type, direction.step_back(target, move_count)),
            target,
            None,
            promotes_on(side, piece_type, target),
            *bit_board,
        ));
        targets &= targets - 1;
    }

    if piece_type == PieceType::King {
        slide_mask(moves, bit_board, side, piece_type, direction, move_mask, move_count + 1);
    }
}

/// Walk candidates up to the first enemy piece on the diagonal. A man covers
/// exactly one square here; a king may cross any number of empty squares
/// first, so its surviving mask recurses before the landing phase runs.
#[allow(clippy::too_many_arguments)]
fn advance_before_enemy(
    moves: &mut Vec<Move>,
    bit_board: &BitBoard,
    side: Side,
    piece_type: PieceType,
    direction: &MoveDirection,
    capture_mask: u64,
    mut move_mask: u64,
    move_count: i32,
) {
    move_mask &= !direction.jump_wall;
    move_mask = direction.shift_bits(move_mask);
    // A chain never crosses a square it has already captured on.
    move_mask &= !capture_mask;

    if move_mask == 0 {
        return;
    }

    let attack_mask = move_mask & bit_board.blocking_of(side.opposite());
    move_mask &= !bit_board.blocking();

    if piece_type == PieceType::King {
        advance_before_enemy(
            moves,
            bit_board,
            side,
            piece_type,
            direction,
            capture_mask,
            move_mask,
            move_count + 1,
        );
    }

    land_after_enemy(
        moves,
        bit_board,
        side,
        piece_type,
        direction,
        capture_mask,
        attack_mask,
        move_count + 1,
        1,
    );
}

/// Land the jumping pieces on the empty squares past the enemy they stand
/// on. Every landing becomes a capture move with its continuations attached;
/// kings may land further along the diagonal, so the mask recurses with both
/// counts incremented.
#[allow(clippy::too_many_arguments)]
fn land_after_enemy(
    moves: &mut Vec<Move>,
    bit_board: &BitBoard,
    side: Side,
    piece_type: PieceType,
    direction: &MoveDirection,
    capture_mask: u64,
    mut move_mask: u64,
    move_count: i32,
    attack_count: i32,
) {
    move_mask &= !direction.slide_wall;
    move_mask = direction.shift_bits(move_mask);
    move_mask &= !bit_board.blocking();
    move_mask &= !capture_mask;

    if move_mask == 0 {
        return;
    }

    let mut targets = move_mask;
    while targets != 0 {
        let target = targets.trailing_zeros() as Square;
        let attacked_position = direction.step_back(target, attack_count);
        let mut capture = Move::new(
            Piece::new(side, piece_type, direction.step_back(target, move_count)),
            target,
            Some(Piece::new(
                side.opposite(),
                bit_board.type_at(attacked_position),
                attacked_position,
            )),
            promotes_on(side, piece_type, target),
            *bit_board,
        );

        generate_follow_moves(&mut capture, capture_mask | (1u64 << attacked_position));
        moves.push(capture);

        targets &= targets - 1;
    }

    if piece_type == PieceType::King {
        land_after_enemy(
            moves,
            bit_board,
            side,
            piece_type,
            direction,
            capture_mask,
            move_mask,
            move_count + 1,
            attack_count + 1,
        );
    }
}

/// Attach every forced continuation of a capture step. The mover carries on
/// from its landing square on the post-step board, as a king once promoted.
fn generate_follow_moves(capture: &mut Move, capture_mask: u64) {
    let effective_type = if capture.promotion {
        PieceType::King
    } else {
        capture.moving_piece.piece_type
    };
    let chain_piece = Piece::new(
        capture.moving_piece.side,
        effective_type,
        capture.target_position,
    );

    let follow_moves = moves_for_piece(&capture.target_bit_board, &chain_piece, capture_mask);
    for follow_move in follow_moves {
        capture.add_follow_move(follow_move);
    }
}

#[cfg(test)]
mod tests {
    use super::{moves_for_game, moves_for_piece, moves_for_side};
    use crate::game_state::bit_board::BitBoard;
    use crate::game_state::draughts_types::{Piece, PieceType, Side};
    use crate::game_state::game_state::Game;

    #[test]
    fn starting_position_offers_seven_slides_per_side() {
        let board = BitBoard::new();

        let white_moves = moves_for_side(&board, Side::White);
        assert_eq!(white_moves.len(), 7);
        for mv in &white_moves {
            assert!(mv.attacked_piece.is_none());
            assert!(!mv.promotion);
            assert_eq!(mv.moving_piece.side, Side::White);
            // Every slide starts on rank 2 and lands on empty rank 3.
            assert_eq!(mv.moving_piece.position / 8, 2);
            assert_eq!(mv.target_position / 8, 3);
            assert_eq!(board.blocking() & (1 << mv.target_position), 0);
        }

        assert_eq!(moves_for_side(&board, Side::Black).len(), 7);
    }

    #[test]
    fn a_possible_capture_is_the_only_legal_move() {
        let board = BitBoard::from_masks(1 << 18, 0, 1 << 25, 0);

        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 1);

        let capture = &moves[0];
        assert_eq!(capture.description(), "F3-G4-H5");
        assert_eq!(capture.moving_piece.position, 18);
        assert_eq!(capture.target_position, 32);
        assert_eq!(capture.attacked_piece.map(|p| p.position), Some(25));
        assert!(capture.follow_moves.is_empty());
        assert_eq!(capture.target_bit_board.black_men, 0);
    }

    #[test]
    fn double_jump_hangs_off_the_first_step() {
        let board = BitBoard::from_masks(1 << 8, 0, (1 << 17) | (1 << 35), 0);

        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 1);

        let first = &moves[0];
        assert_eq!(first.description(), "H2-G3-F4");
        assert_eq!(first.follow_moves.len(), 1);

        let second = &first.follow_moves[0];
        assert_eq!(second.moving_piece.position, 26);
        assert_eq!(second.target_position, 44);
        assert_eq!(second.attacked_piece.map(|p| p.position), Some(35));
        assert!(second.follow_moves.is_empty());
    }

    #[test]
    fn men_capture_backwards_but_never_slide_backwards() {
        // A white man with a jump available behind it must take it.
        let board = BitBoard::from_masks(1 << 26, 0, 1 << 17, 0);
        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].attacked_piece.map(|p| p.position), Some(17));
        assert_eq!(moves[0].target_position, 8);

        // Without the jump, only the two forward slides remain.
        let quiet = BitBoard::from_masks(1 << 26, 0, 0, 0);
        let slides = moves_for_side(&quiet, Side::White);
        assert_eq!(slides.len(), 2);
        for mv in &slides {
            assert!(mv.target_position > mv.moving_piece.position);
        }
    }

    #[test]
    fn a_capture_landing_on_the_last_rank_promotes() {
        let board = BitBoard::from_masks(1 << 42, 0, 1 << 49, 0);

        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 1);

        let capture = &moves[0];
        assert_eq!(capture.target_position, 56);
        assert!(capture.promotion);
        assert!(capture.follow_moves.is_empty());
        assert_eq!(capture.target_bit_board.white_kings, 1 << 56);
        assert_eq!(capture.target_bit_board.white_men, 0);
    }

    #[test]
    fn a_man_promoted_mid_chain_continues_as_a_king() {
        let board = BitBoard::from_masks(1 << 40, 0, (1 << 49) | (1 << 51), 0);

        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 1);

        let first = &moves[0];
        assert_eq!(first.target_position, 58);
        assert!(first.promotion);

        // The fresh king takes the second man and may land anywhere along
        // the cleared diagonal behind it.
        assert_eq!(first.follow_moves.len(), 4);
        for follow_move in &first.follow_moves {
            assert_eq!(follow_move.moving_piece.piece_type, PieceType::King);
            assert_eq!(follow_move.attacked_piece.map(|p| p.position), Some(51));
        }
    }

    #[test]
    fn a_king_slides_the_whole_diagonal() {
        let board = BitBoard::from_masks(0, 1 << 0, 0, 0);

        let moves = moves_for_side(&board, Side::White);
        assert_eq!(moves.len(), 7);
        for mv in &moves {
            assert_eq!(mv.moving_piece.position, 0);
            assert_eq!(mv.target_position % 9, 0);
            assert!(!mv.promotion);
        }
    }

    #[test]
    fn a_king_captures_at_a_distance_with_free_landing_choice() {
        let board = BitBoard::from_masks(0, 1 << 0, 1 << 27, 0);

        let moves = moves_for_side(&board, Side::White);
        // Landing squares 36, 45, 54 and 63 behind the jumped man.
        assert_eq!(moves.len(), 4);
        for mv in &moves {
            assert_eq!(mv.moving_piece.position, 0);
            assert_eq!(mv.attacked_piece.map(|p| p.position), Some(27));
            assert!(mv.follow_moves.is_empty());
        }
    }

    #[test]
    fn an_already_captured_square_cannot_be_jumped_again() {
        let board = BitBoard::from_masks(1 << 18, 0, 1 << 25, 0);
        let piece = Piece::new(Side::White, PieceType::Man, 18);

        assert_eq!(moves_for_piece(&board, &piece, 0).len(), 1);
        assert!(moves_for_piece(&board, &piece, 1 << 25).is_empty());
    }

    #[test]
    fn no_chain_leaf_captures_the_same_square_twice() {
        // A ring of black men around a jumping white man: every chain path
        // must consist of distinct attacked squares.
        let board = BitBoard::from_masks(
            1 << 18,
            0,
            (1 << 25) | (1 << 41) | (1 << 43) | (1 << 27),
            0,
        );

        fn assert_distinct_attacks(mv: &crate::moves::draughts_move::Move, mut seen: u64) {
            let attacked = mv.attacked_piece.expect("chain steps are captures");
            assert_eq!(seen & (1 << attacked.position), 0);
            seen |= 1 << attacked.position;
            for follow_move in &mv.follow_moves {
                assert_distinct_attacks(follow_move, seen);
            }
        }

        let moves = moves_for_side(&board, Side::White);
        assert!(!moves.is_empty());
        for mv in &moves {
            assert!(mv.attacked_piece.is_some());
            assert_distinct_attacks(mv, 0);
        }
    }

    #[test]
    fn moves_for_game_serves_only_the_running_chain() {
        let board = BitBoard::from_masks(1 << 8, 0, (1 << 17) | (1 << 35), 0);
        let mut game = Game::new();
        game.bit_board = board;

        let moves = moves_for_game(&game);
        assert_eq!(moves.len(), 1);
        game.execute_move(&moves[0]);

        // The combo is still open: only the continuation jump is offered.
        assert_eq!(game.current_turn, Side::White);
        let continuations = moves_for_game(&game);
        assert_eq!(continuations.len(), 1);
        assert_eq!(continuations[0].moving_piece.position, 26);
        assert_eq!(continuations[0].attacked_piece.map(|p| p.position), Some(35));
    }

    #[test]
    fn every_generated_move_starts_from_the_given_position() {
        let board = BitBoard::new();
        for side in [Side::White, Side::Black] {
            for mv in moves_for_side(&board, side) {
                assert_eq!(mv.source_bit_board, board);
                assert_eq!(mv.moving_piece.side, side);
                assert_ne!(
                    board.pieces_of(side, mv.moving_piece.piece_type)
                        & (1 << mv.moving_piece.position),
                    0
                );
            }
        }
    }
}
