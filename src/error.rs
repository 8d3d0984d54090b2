use std::io;

use thiserror::Error;

use crate::game::SessionStatus;

#[derive(Debug, Error)]
pub enum GameError {
    /// An operation was called in a lifecycle state that does not allow it,
    /// e.g. a move before `start`.
    #[error("cannot {operation} while the session is {status:?}")]
    InvalidSessionState {
        operation: &'static str,
        status: SessionStatus,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
