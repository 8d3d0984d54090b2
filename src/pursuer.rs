use crate::maze::{Direction, Grid, Position};

/// Greedy chase step. Closes the horizontal gap first and only tries the
/// vertical axis when no horizontal step was taken. Never searches, so it
/// can sit still against a wall indefinitely.
pub fn next_position(pursuer: Position, player: Position, grid: &Grid) -> Position {
    let candidates = [
        (pursuer.x < player.x, Direction::Right),
        (pursuer.x > player.x, Direction::Left),
        (pursuer.y < player.y, Direction::Down),
        (pursuer.y > player.y, Direction::Up),
    ];
    candidates
        .into_iter()
        .find(|&(wanted, dir)| wanted && grid.can_step(pursuer, dir))
        .and_then(|(_, dir)| pursuer.step(dir))
        .unwrap_or(pursuer)
}
