use tracing::{debug, trace};

use crate::maze::{generate, Direction, DotField, Grid, Position, GRID_SIZE};
use crate::pursuer;

pub const DOT_SCORE: u32 = 10;
pub const STARTING_LIVES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
}

impl ScoreState {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
            lives: STARTING_LIVES,
        }
    }

    fn add(&mut self, points: u32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }
}

/// What a step did to the session as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    LifeLost { lives_remaining: u32 },
    OutOfLives,
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStep {
    pub position: Position,
    pub ate_dot: bool,
    pub resolution: Resolution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerStep {
    pub position: Position,
    pub resolution: Resolution,
}

/// Mutable state of one session: the maze, both agents and the score.
#[derive(Clone, Debug)]
pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) dots: DotField,
    pub(crate) player: Position,
    pub(crate) pursuer: Position,
    pub(crate) player_start: Position,
    pub(crate) pursuer_start: Position,
    pub(crate) score: ScoreState,
}

impl Simulation {
    pub fn new(high_score: u32) -> Self {
        let maze = generate(GRID_SIZE);
        Self {
            grid: maze.grid,
            dots: maze.dots,
            player: maze.player_start,
            pursuer: maze.pursuer_start,
            player_start: maze.player_start,
            pursuer_start: maze.pursuer_start,
            score: ScoreState::new(high_score),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dots(&self) -> &DotField {
        &self.dots
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn pursuer(&self) -> Position {
        self.pursuer
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn is_valid_move(&self, pos: Position) -> bool {
        self.grid.is_walkable(pos)
    }

    /// Moves the player one cell. `None` when the target is a wall or off the
    /// board, in which case nothing changed.
    pub fn move_player(&mut self, dir: Direction) -> Option<PlayerStep> {
        let target = self.player.step(dir).filter(|pos| self.is_valid_move(*pos))?;
        self.player = target;
        trace!(position = %target, ?dir, "player moved");

        let ate_dot = self.dots.take(target);
        if ate_dot {
            self.score.add(DOT_SCORE);
            if self.dots.is_empty() {
                debug!(score = self.score.score, "last dot eaten");
                return Some(PlayerStep {
                    position: target,
                    ate_dot,
                    resolution: Resolution::Cleared,
                });
            }
        }

        Some(PlayerStep {
            position: target,
            ate_dot,
            resolution: self.check_collision(),
        })
    }

    pub fn tick_pursuer(&mut self) -> PursuerStep {
        self.pursuer = pursuer::next_position(self.pursuer, self.player, &self.grid);
        trace!(position = %self.pursuer, "pursuer moved");
        PursuerStep {
            position: self.pursuer,
            resolution: self.check_collision(),
        }
    }

    /// On contact the player loses a life. Agents go back to their start cells
    /// unless that was the last life; dots and score are kept either way.
    pub fn check_collision(&mut self) -> Resolution {
        if self.player != self.pursuer {
            return Resolution::Continue;
        }
        self.score.lives = self.score.lives.saturating_sub(1);
        if self.score.lives == 0 {
            debug!(score = self.score.score, "caught on the last life");
            return Resolution::OutOfLives;
        }
        self.player = self.player_start;
        self.pursuer = self.pursuer_start;
        debug!(lives = self.score.lives, "caught, agents reset");
        Resolution::LifeLost {
            lives_remaining: self.score.lives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{PLAYER_START, PURSUER_START};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn sim() -> Simulation {
        Simulation::new(0)
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    fn walls_reject_the_move(mut sim: Simulation, #[case] dir: Direction) {
        // Both (14,22) and (14,24) are pillars.
        let before = (sim.player, sim.pursuer, sim.score, sim.dots.remaining());
        assert_eq!(sim.move_player(dir), None);
        assert_eq!(before, (sim.player, sim.pursuer, sim.score, sim.dots.remaining()));
    }

    #[rstest]
    fn border_rejects_the_move(mut sim: Simulation) {
        sim.player = Position::new(1, 1);
        assert_eq!(sim.move_player(Direction::Left), None);
        assert_eq!(sim.move_player(Direction::Up), None);
        assert_eq!(sim.player, Position::new(1, 1));
    }

    #[rstest]
    fn eating_a_dot_scores_ten(mut sim: Simulation) {
        let before = sim.dots.remaining();
        let step = sim.move_player(Direction::Left).unwrap();
        assert_eq!(step.position, Position::new(13, 23));
        assert!(step.ate_dot);
        assert_eq!(step.resolution, Resolution::Continue);
        assert_eq!(sim.score.score, 10);
        assert_eq!(sim.score.high_score, 10);
        assert_eq!(sim.dots.remaining(), before - 1);

        let back = sim.move_player(Direction::Right).unwrap();
        assert!(!back.ate_dot);
        assert_eq!(sim.score.score, 10);
        assert_eq!(sim.dots.remaining(), before - 1);
    }

    #[test]
    fn high_score_only_rises_past_the_record() {
        let mut sim = Simulation::new(30);
        sim.move_player(Direction::Left).unwrap();
        assert_eq!(sim.score.high_score, 30);
        sim.move_player(Direction::Left).unwrap();
        sim.move_player(Direction::Left).unwrap();
        sim.move_player(Direction::Left).unwrap();
        assert_eq!(sim.score.score, 40);
        assert_eq!(sim.score.high_score, 40);
    }

    #[rstest]
    fn last_dot_clears_without_collision_check(mut sim: Simulation) {
        let target = Position::new(13, 23);
        sim.dots = DotField::only(GRID_SIZE, &[target]);
        sim.pursuer = target;
        let step = sim.move_player(Direction::Left).unwrap();
        assert_eq!(step.resolution, Resolution::Cleared);
        assert_eq!(sim.dots.remaining(), 0);
        assert_eq!(sim.score.lives, STARTING_LIVES);
        assert_eq!(sim.player, target);
    }

    #[rstest]
    fn walking_into_the_pursuer_costs_a_life(mut sim: Simulation) {
        sim.pursuer = Position::new(15, 23);
        let step = sim.move_player(Direction::Right).unwrap();
        assert_eq!(step.resolution, Resolution::LifeLost { lives_remaining: 2 });
        assert_eq!(sim.player, PLAYER_START);
        assert_eq!(sim.pursuer, PURSUER_START);
        assert_eq!(sim.score.score, 10);
        assert!(!sim.dots.contains(Position::new(15, 23)));
    }

    #[rstest]
    fn pursuer_catching_the_player(mut sim: Simulation) {
        sim.player = Position::new(13, 23);
        sim.pursuer = Position::new(13, 22);
        let step = sim.tick_pursuer();
        assert_eq!(step.position, Position::new(13, 23));
        assert_eq!(step.resolution, Resolution::LifeLost { lives_remaining: 2 });
        assert_eq!((sim.player, sim.pursuer), (PLAYER_START, PURSUER_START));
    }

    #[rstest]
    fn third_catch_ends_without_reposition(mut sim: Simulation) {
        let spot = Position::new(13, 23);
        for expected in [2, 1] {
            sim.player = spot;
            sim.pursuer = spot;
            assert_eq!(
                sim.check_collision(),
                Resolution::LifeLost { lives_remaining: expected }
            );
            assert_eq!(sim.player, PLAYER_START);
        }
        sim.player = spot;
        sim.pursuer = spot;
        assert_eq!(sim.check_collision(), Resolution::OutOfLives);
        assert_eq!(sim.score.lives, 0);
        assert_eq!(sim.player, spot);
    }

    #[rstest]
    fn apart_is_not_a_collision(mut sim: Simulation) {
        assert_eq!(sim.check_collision(), Resolution::Continue);
        assert_eq!(sim.score.lives, STARTING_LIVES);
    }

    #[rstest]
    fn random_walk_keeps_invariants(mut sim: Simulation) {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let total = sim.dots.remaining();
        for _ in 0..2_000 {
            let score_before = sim.score.score;
            let dots_before = sim.dots.remaining();
            let dir = Direction::ALL[rng.gen_range(0..4)];
            let resolution = match sim.move_player(dir) {
                Some(step) => {
                    if step.ate_dot {
                        assert_eq!(sim.score.score, score_before + DOT_SCORE);
                        assert_eq!(sim.dots.remaining(), dots_before - 1);
                    } else {
                        assert_eq!(sim.score.score, score_before);
                    }
                    step.resolution
                }
                None => sim.tick_pursuer().resolution,
            };
            assert!(sim.grid.is_walkable(sim.player));
            assert!(sim.grid.is_walkable(sim.pursuer));
            assert_eq!(sim.score.score as usize, (total - sim.dots.remaining()) * DOT_SCORE as usize);
            if matches!(resolution, Resolution::OutOfLives | Resolution::Cleared) {
                break;
            }
        }
    }
}
