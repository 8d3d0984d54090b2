use std::collections::vec_deque::Drain;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::error::{GameError, GameResult};
use crate::events::{EndMessage, GameEvent};
use crate::maze::Direction;
use crate::schedule::TickSchedule;
use crate::simulation::{Resolution, ScoreState, Simulation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Active,
    Won,
    /// Still in play; the next move or tick, blocked or not, puts the session
    /// back to `Active`.
    LostLife,
    GameOver,
}

impl SessionStatus {
    pub fn in_play(self) -> bool {
        matches!(self, SessionStatus::Active | SessionStatus::LostLife)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Won | SessionStatus::GameOver)
    }
}

/// How the last session ended, kept until reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub won: bool,
    pub final_score: u32,
    pub high_score: u32,
    pub message: EndMessage,
}

/// Owns the session, the pursuer schedule and the session-lifetime high score.
/// Every state change is reported as a [`GameEvent`] on an internal queue.
pub struct Game {
    status: SessionStatus,
    sim: Option<Simulation>,
    high_score: u32,
    schedule: TickSchedule,
    outcome: Option<Outcome>,
    events: VecDeque<GameEvent>,
}

impl Game {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            status: SessionStatus::NotStarted,
            sim: None,
            high_score: 0,
            schedule: TickSchedule::new(tick_interval),
            outcome: None,
            events: VecDeque::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn score(&self) -> Option<ScoreState> {
        self.sim.as_ref().map(Simulation::score)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_ticking(&self) -> bool {
        self.schedule.is_armed()
    }

    pub fn drain_events(&mut self) -> Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    fn require(&self, operation: &'static str, allowed: bool) -> GameResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(GameError::InvalidSessionState {
                operation,
                status: self.status,
            })
        }
    }

    fn live_sim(&mut self, operation: &'static str) -> GameResult<&mut Simulation> {
        let status = self.status;
        match self.sim.as_mut() {
            Some(sim) if status.in_play() => Ok(sim),
            _ => Err(GameError::InvalidSessionState { operation, status }),
        }
    }

    pub fn start(&mut self, now: Instant) -> GameResult<()> {
        self.require("start", self.status == SessionStatus::NotStarted)?;
        let sim = Simulation::new(self.high_score);
        self.events.push_back(GameEvent::BoardInitialized {
            grid: sim.grid().clone(),
            dots: sim.dots().clone(),
            player: sim.player(),
            pursuer: sim.pursuer(),
        });
        info!(dots = sim.dots().remaining(), high_score = self.high_score, "session started");
        self.sim = Some(sim);
        self.outcome = None;
        self.status = SessionStatus::Active;
        self.schedule.arm(now);
        Ok(())
    }

    /// Back to the start screen. Session data is dropped, the high score stays.
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.sim = None;
        self.outcome = None;
        self.status = SessionStatus::NotStarted;
        self.events.push_back(GameEvent::SessionReset {
            high_score: self.high_score,
        });
        info!(high_score = self.high_score, "session reset");
    }

    pub fn direction_pressed(&mut self, dir: Direction) -> GameResult<()> {
        let sim = self.live_sim("move")?;
        let step = sim.move_player(dir);
        let score = sim.score();
        self.status = SessionStatus::Active;
        let Some(step) = step else {
            trace!(?dir, "move blocked");
            return Ok(());
        };
        self.high_score = self.high_score.max(score.high_score);
        self.events.push_back(GameEvent::PlayerMoved {
            position: step.position,
            ate_dot: step.ate_dot,
            score: score.score,
            high_score: self.high_score,
        });
        self.resolve(step.resolution)
    }

    pub fn tick_pursuer(&mut self) -> GameResult<()> {
        let sim = self.live_sim("tick")?;
        let step = sim.tick_pursuer();
        self.events.push_back(GameEvent::PursuerMoved {
            position: step.position,
        });
        self.resolve(step.resolution)
    }

    /// Runs the pursuer when its schedule is due. Returns whether it ticked.
    pub fn poll(&mut self, now: Instant) -> GameResult<bool> {
        if !self.status.in_play() || !self.schedule.fire_if_due(now) {
            return Ok(false);
        }
        self.tick_pursuer()?;
        Ok(true)
    }

    pub fn end(&mut self, won: bool) -> GameResult<()> {
        self.require("end", self.status.in_play())?;
        self.schedule.cancel();
        let score = self.score().unwrap_or(ScoreState::new(self.high_score));
        let message = EndMessage::derive(won, score.score, self.high_score, score.lives);
        let outcome = Outcome {
            won,
            final_score: score.score,
            high_score: self.high_score,
            message,
        };
        self.status = if won {
            SessionStatus::Won
        } else {
            SessionStatus::GameOver
        };
        self.outcome = Some(outcome);
        self.events.push_back(GameEvent::SessionEnded {
            won,
            final_score: outcome.final_score,
            high_score: outcome.high_score,
            message,
        });
        info!(won, score = outcome.final_score, high_score = outcome.high_score, %message, "session ended");
        Ok(())
    }

    fn resolve(&mut self, resolution: Resolution) -> GameResult<()> {
        match resolution {
            Resolution::Continue => {
                self.status = SessionStatus::Active;
                Ok(())
            }
            Resolution::LifeLost { lives_remaining } => {
                self.status = SessionStatus::LostLife;
                debug!(lives_remaining, "life lost");
                if let Some(sim) = self.sim.as_ref() {
                    self.events.push_back(GameEvent::LifeLost {
                        lives_remaining,
                        player: sim.player(),
                        pursuer: sim.pursuer(),
                    });
                }
                Ok(())
            }
            Resolution::OutOfLives => self.end(false),
            Resolution::Cleared => self.end(true),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(TickSchedule::default().interval())
    }
}
