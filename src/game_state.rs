pub mod bit_board;
pub mod draughts_types;
pub mod game_state;
