use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

use maze_chase::{
    Cell, Direction, EndMessage, Game, GameEvent, GameResult, Position, SessionStatus, Settings,
    GRID_SIZE, STARTING_LIVES,
};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Pursuer,
    Wall,
    Empty,
    Dot,
}

#[derive(Clone, Copy, PartialEq)]
struct ViewCell {
    glyph: Glyph,
    color: Color,
}

/// What the screen shows, rebuilt only from drained game events.
struct BoardView {
    size: usize,
    walls: Vec<bool>,
    dots: Vec<bool>,
    player: Position,
    pursuer: Position,
    score: u32,
    high_score: u32,
    lives: u32,
    dots_left: usize,
    ending: Option<(EndMessage, u32, u32)>,
}

impl BoardView {
    fn new() -> Self {
        Self {
            size: GRID_SIZE,
            walls: vec![false; GRID_SIZE * GRID_SIZE],
            dots: vec![false; GRID_SIZE * GRID_SIZE],
            player: Position::new(0, 0),
            pursuer: Position::new(0, 0),
            score: 0,
            high_score: 0,
            lives: STARTING_LIVES,
            dots_left: 0,
            ending: None,
        }
    }

    fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::BoardInitialized {
                grid,
                dots,
                player,
                pursuer,
            } => {
                self.size = grid.size();
                self.walls = grid
                    .rows()
                    .flat_map(|row| row.iter().map(|cell| *cell == Cell::Wall))
                    .collect();
                self.dots = vec![false; self.size * self.size];
                for pos in dots.iter() {
                    self.dots[pos.y * self.size + pos.x] = true;
                }
                self.dots_left = dots.remaining();
                self.player = player;
                self.pursuer = pursuer;
                self.score = 0;
                self.lives = STARTING_LIVES;
                self.ending = None;
            }
            GameEvent::PlayerMoved {
                position,
                ate_dot,
                score,
                high_score,
            } => {
                self.player = position;
                if ate_dot {
                    self.dots[position.y * self.size + position.x] = false;
                    self.dots_left = self.dots_left.saturating_sub(1);
                }
                self.score = score;
                self.high_score = high_score;
            }
            GameEvent::PursuerMoved { position } => self.pursuer = position,
            GameEvent::LifeLost {
                lives_remaining,
                player,
                pursuer,
            } => {
                self.lives = lives_remaining;
                self.player = player;
                self.pursuer = pursuer;
            }
            GameEvent::SessionEnded {
                final_score,
                high_score,
                message,
                ..
            } => {
                self.ending = Some((message, final_score, high_score));
            }
            GameEvent::SessionReset { high_score } => {
                self.high_score = high_score;
                self.score = 0;
                self.lives = STARTING_LIVES;
                self.ending = None;
            }
        }
    }

    fn cell_at(&self, pos: Position) -> ViewCell {
        let idx = pos.y * self.size + pos.x;
        let (glyph, color) = if pos == self.player {
            (Glyph::Player, Color::Yellow)
        } else if pos == self.pursuer {
            (Glyph::Pursuer, Color::Red)
        } else if self.walls[idx] {
            (Glyph::Wall, Color::Blue)
        } else if self.dots[idx] {
            (Glyph::Dot, Color::White)
        } else {
            (Glyph::Empty, Color::Reset)
        };
        ViewCell { glyph, color }
    }
}

struct Renderer {
    last: Vec<ViewCell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(size: usize) -> Self {
        Self {
            last: vec![
                ViewCell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn main() -> GameResult<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// The terminal is taken over by the game, so logs only go to a file.
fn init_logging(settings: &Settings) -> io::Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("maze_chase=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> GameResult<()> {
    let mut game = Game::new(settings.tick_interval());
    let mut view = BoardView::new();
    let mut renderer = Renderer::new(GRID_SIZE);
    let frame_time = settings.frame_time();
    let mut shown = None;
    info!(tick_ms = settings.tick_ms, fps = settings.render_fps, "terminal frontend up");

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                handle_key(&mut game, key.code)?;
            }
        }

        game.poll(Instant::now())?;
        for event in game.drain_events() {
            view.apply(event);
        }

        let status = game.status();
        let screen = (status == SessionStatus::NotStarted, status.in_play());
        if shown != Some(screen) {
            stdout.queue(Clear(ClearType::All))?;
            renderer.needs_full = true;
            shown = Some(screen);
        }
        match status {
            SessionStatus::NotStarted => render_start(stdout, &view)?,
            s if s.is_finished() => render_game_over(stdout, &view)?,
            _ => render(stdout, &view, &mut renderer)?,
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn handle_key(game: &mut Game, code: KeyCode) -> GameResult<()> {
    match game.status() {
        SessionStatus::NotStarted => {
            if matches!(code, KeyCode::Enter | KeyCode::Char('s')) {
                game.start(Instant::now())?;
            }
        }
        status if status.is_finished() => {
            if matches!(code, KeyCode::Enter | KeyCode::Char('r')) {
                game.reset();
            }
        }
        _ => {
            if code == KeyCode::Esc {
                game.end(false)?;
            } else if let Some(dir) = direction_for(code) {
                game.direction_pressed(dir)?;
            }
        }
    }
    Ok(())
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}

/// Top-left of the board, or `None` when the terminal is too small to hold it.
fn board_origin(size: usize) -> io::Result<Option<(u16, u16)>> {
    let needed_h = (size + 2) as u16;
    let needed_w = (size * CELL_W) as u16;
    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        return Ok(None);
    }
    Ok(Some(((term_w - needed_w) / 2, (term_h - needed_h) / 2 + 1)))
}

fn too_small(stdout: &mut Stdout, size: usize) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Clear(ClearType::All))?;
    stdout.queue(Print(format!(
        "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
        size * CELL_W,
        size + 2,
        term_w,
        term_h
    )))?;
    stdout.flush()
}

fn print_lines(stdout: &mut Stdout, lines: &[String]) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let top = (term_h / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, line) in lines.iter().enumerate() {
        let width = UnicodeWidthStr::width(line.as_str()) as u16;
        stdout.queue(MoveTo(term_w.saturating_sub(width) / 2, top + i as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.flush()
}

fn render_start(stdout: &mut Stdout, view: &BoardView) -> io::Result<()> {
    print_lines(
        stdout,
        &[
            "MAZE CHASE".to_string(),
            format!("High score: {}", view.high_score),
            String::new(),
            "Enter or s to start, q to quit".to_string(),
        ],
    )
}

fn render(stdout: &mut Stdout, view: &BoardView, renderer: &mut Renderer) -> io::Result<()> {
    let Some((origin_x, origin_y)) = board_origin(view.size)? else {
        renderer.needs_full = true;
        return too_small(stdout, view.size);
    };
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = format!(
        "Score: {}  High: {}  Lives: {}  Dots: {}  (Esc gives up, q quits)",
        view.score, view.high_score, view.lives, view.dots_left
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..view.size {
        for x in 0..view.size {
            let cell = view.cell_at(Position::new(x, y));
            let idx = y * view.size + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: ViewCell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Pursuer => "👻",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Dot => "· ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn render_game_over(stdout: &mut Stdout, view: &BoardView) -> io::Result<()> {
    let Some((message, final_score, high_score)) = view.ending else {
        warn!("game-over screen without an ending");
        return Ok(());
    };
    print_lines(
        stdout,
        &[
            message.to_string(),
            format!("Final score: {final_score}"),
            format!("High score: {high_score}"),
            String::new(),
            "Enter or r to retry, q to quit".to_string(),
        ],
    )
}
