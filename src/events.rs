use std::fmt;

use crate::maze::{DotField, Grid, Position};

/// Why a session ended, in the priority order it is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndMessage {
    Won,
    NewHighScore,
    OutOfLives,
    GameOver,
}

impl EndMessage {
    pub fn derive(won: bool, score: u32, high_score: u32, lives: u32) -> Self {
        if won {
            EndMessage::Won
        } else if score == high_score && score > 0 {
            EndMessage::NewHighScore
        } else if lives == 0 {
            EndMessage::OutOfLives
        } else {
            EndMessage::GameOver
        }
    }
}

impl fmt::Display for EndMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndMessage::Won => "Congratulations! You've won!",
            EndMessage::NewHighScore => "New High Score! Congratulations!",
            EndMessage::OutOfLives => "Out of lives! Better luck next time!",
            EndMessage::GameOver => "Game Over!",
        };
        f.write_str(text)
    }
}

/// Observations for the presentation layer, queued in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    BoardInitialized {
        grid: Grid,
        dots: DotField,
        player: Position,
        pursuer: Position,
    },
    PlayerMoved {
        position: Position,
        ate_dot: bool,
        score: u32,
        high_score: u32,
    },
    PursuerMoved {
        position: Position,
    },
    /// `player` and `pursuer` are the start cells both agents were sent back to.
    LifeLost {
        lives_remaining: u32,
        player: Position,
        pursuer: Position,
    },
    SessionEnded {
        won: bool,
        final_score: u32,
        high_score: u32,
        message: EndMessage,
    },
    SessionReset {
        high_score: u32,
    },
}
