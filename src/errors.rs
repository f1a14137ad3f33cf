use std::error::Error;
use std::fmt;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    NoLegalMoves,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoLegalMoves => write!(f, "no legal moves in this position"),
        }
    }
}

impl Error for EngineError {}
