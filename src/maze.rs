use std::fmt;

pub const GRID_SIZE: usize = 28;
/// Smallest grid that keeps both start cells inside the border.
pub const MIN_GRID_SIZE: usize = 25;
pub const PLAYER_START: Position = Position { x: 14, y: 23 };
pub const PURSUER_START: Position = Position { x: 14, y: 11 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// One cell over in `dir`. `None` when the step would leave the
    /// non-negative quadrant; the upper bound is the grid's business.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Position { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Maps a key name from an input device onto a direction, for hosts that
    /// deliver keys by name (e.g. a browser's `KeyboardEvent.key`). Anything
    /// that is not one of the four cardinal directions is ignored.
    pub fn from_key_name(name: &str) -> Option<Direction> {
        match name.trim().to_ascii_lowercase().as_str() {
            "arrowup" | "up" => Some(Direction::Up),
            "arrowdown" | "down" => Some(Direction::Down),
            "arrowleft" | "left" => Some(Direction::Left),
            "arrowright" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Square wall/path matrix, indexed `cells[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    /// In bounds and not a wall.
    pub fn is_walkable(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(Cell::Path))
    }

    pub fn can_step(&self, pos: Position, dir: Direction) -> bool {
        pos.step(dir).is_some_and(|next| self.is_walkable(next))
    }

    pub fn path_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Path)
                .map(move |(x, _)| Position { x, y })
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }
}

/// Cells still holding a dot. Only ever shrinks during a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotField {
    size: usize,
    dots: Vec<bool>,
    remaining: usize,
}

impl DotField {
    fn empty(size: usize) -> Self {
        Self {
            size,
            dots: vec![false; size * size],
            remaining: 0,
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.x < self.size && pos.y < self.size).then_some(pos.y * self.size + pos.x)
    }

    fn place(&mut self, pos: Position) {
        if let Some(idx) = self.index(pos) {
            if !self.dots[idx] {
                self.dots[idx] = true;
                self.remaining += 1;
            }
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.dots[idx])
    }

    /// Removes the dot at `pos`, reporting whether there was one.
    pub fn take(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) if self.dots[idx] => {
                self.dots[idx] = false;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, dot)| **dot)
            .map(move |(idx, _)| Position {
                x: idx % size,
                y: idx / size,
            })
    }

    #[cfg(test)]
    pub(crate) fn only(size: usize, positions: &[Position]) -> Self {
        let mut field = Self::empty(size);
        for pos in positions {
            field.place(*pos);
        }
        field
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub grid: Grid,
    pub dots: DotField,
    pub player_start: Position,
    pub pursuer_start: Position,
}

fn is_wall(x: usize, y: usize, size: usize) -> bool {
    let last = size.checked_sub(1);
    let open_lane = size.checked_sub(2);
    let border = x == 0 || y == 0 || last == Some(x) || last == Some(y);
    border || (x % 2 == 0 && y % 2 == 0 && open_lane != Some(x) && open_lane != Some(y))
}

/// Builds the fixed pillar maze: a solid border plus a wall on every cell
/// whose coordinates are both even, except along row and column `size - 2`.
/// Every path cell except the two start cells gets a dot.
///
/// The start cells are fixed and only land on path for sizes of at least
/// [`MIN_GRID_SIZE`]. Smaller grids still generate, but a start cell that is
/// not path gets no dot and is not walkable.
pub fn generate(size: usize) -> Maze {
    let mut cells = vec![vec![Cell::Path; size]; size];
    for (y, row) in cells.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if is_wall(x, y, size) {
                *cell = Cell::Wall;
            }
        }
    }
    let grid = Grid { size, cells };

    let mut dots = DotField::empty(size);
    for pos in grid.path_cells() {
        if pos != PLAYER_START && pos != PURSUER_START {
            dots.place(pos);
        }
    }

    Maze {
        grid,
        dots,
        player_start: PLAYER_START,
        pursuer_start: PURSUER_START,
    }
}
