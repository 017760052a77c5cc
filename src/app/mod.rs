mod renderer;

pub use renderer::{Frame, Renderer, Tile};

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    queue,
    terminal::{self, ClearType},
};

use crate::{
    agents::{Actor, Player, Speed, WallFollower},
    config::{Config, GameMode},
    generators::{Generator, generate_maze},
    maze::{Direction, Maze},
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    BotEscaped,
    PlayerEscaped,
    /// Both reached the exit on the same frame.
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Everything that changes while the game runs.
struct Session {
    maze: Maze,
    bot: Option<WallFollower>,
    player: Option<Player>,
    generator: Generator,
    speed: Speed,
    paused: bool,
    outcome: Option<Outcome>,
    /// Number of mazes generated so far, mixed into the seed.
    generation: u64,
    frames: u64,
}

impl Session {
    fn new(rows: u8, cols: u8, config: &Config) -> anyhow::Result<Self> {
        let mut session = Session {
            maze: Maze::new(rows, cols),
            bot: None,
            player: None,
            generator: config.generator,
            speed: config.speed,
            paused: false,
            outcome: None,
            generation: 0,
            frames: 0,
        };
        session.regenerate(config)?;
        Ok(session)
    }

    /// Carve a fresh maze and put new actors at its entrance.
    fn regenerate(&mut self, config: &Config) -> anyhow::Result<()> {
        let seed = config.seed.map(|s| s.wrapping_add(self.generation));
        self.generation += 1;
        generate_maze(&mut self.maze, self.generator, seed)?;

        self.bot = matches!(config.mode, GameMode::Watch | GameMode::Race)
            .then(|| WallFollower::new(&self.maze, self.speed));
        self.player = matches!(config.mode, GameMode::Play | GameMode::Race)
            .then(|| Player::new(&self.maze, self.speed));
        self.outcome = None;
        self.frames = 0;
        tracing::info!(
            "[app] Generated maze #{} with {} (seed {:?}), entrance {:?}, exit {:?}",
            self.generation,
            self.generator,
            seed,
            self.maze.entrance(),
            self.maze.exit()
        );
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(bot) = self.bot.as_mut() {
            bot.reset(&mut self.maze);
        }
        if let Some(player) = self.player.as_mut() {
            player.reset(&mut self.maze);
            player.release_all();
        }
        self.outcome = None;
        self.frames = 0;
        tracing::info!("[app] Reset actors to the entrance");
    }

    fn change_speed(&mut self, speed: Speed) {
        if speed == self.speed {
            return;
        }
        self.speed = speed;
        if let Some(bot) = self.bot.as_mut() {
            bot.notify_speed_change(speed);
        }
        if let Some(player) = self.player.as_mut() {
            player.notify_speed_change(speed);
        }
        tracing::debug!("[app] Speed set to {}", speed.get());
    }

    /// Move every actor by one frame and check whether anyone got out.
    /// `release_taps` lets go of the player's keys once it commits to a move,
    /// for terminals that never report key releases.
    fn advance(&mut self, release_taps: bool) -> anyhow::Result<()> {
        if self.paused || self.outcome.is_some() {
            return Ok(());
        }
        self.frames += 1;

        if let Some(bot) = self.bot.as_mut() {
            bot.step(&mut self.maze)?;
        }
        if let Some(player) = self.player.as_mut() {
            let was_aligned = player.is_aligned();
            player.step(&mut self.maze)?;
            if release_taps && was_aligned && player.direction().is_some() {
                player.release_all();
            }
        }

        let bot_done = self.bot.as_ref().is_some_and(|b| b.has_finished(&self.maze));
        let player_done = self
            .player
            .as_ref()
            .is_some_and(|p| p.has_finished(&self.maze));
        self.outcome = match (bot_done, player_done) {
            (true, true) => Some(Outcome::Tie),
            (true, false) => Some(Outcome::BotEscaped),
            (false, true) => Some(Outcome::PlayerEscaped),
            (false, false) => None,
        };
        if let Some(outcome) = self.outcome {
            tracing::info!("[app] {:?} after {} frames", outcome, self.frames);
        }
        Ok(())
    }

    fn status(&self, mode: GameMode) -> String {
        let state = match (self.outcome, mode) {
            (Some(Outcome::BotEscaped), GameMode::Race) => "The bot wins!".to_string(),
            (Some(Outcome::BotEscaped), _) => "The bot found the exit".to_string(),
            (Some(Outcome::PlayerEscaped), GameMode::Race) => "You win!".to_string(),
            (Some(Outcome::PlayerEscaped), _) => "You found the exit!".to_string(),
            (Some(Outcome::Tie), _) => "It's a tie!".to_string(),
            (None, _) if self.paused => "Paused".to_string(),
            (None, _) => format!("Frame {}", self.frames),
        };
        format!(
            "{} | {} | {}x{} | speed {} | {} | [space] pause [+/-] speed [r] reset [n] new [1-3] generator [esc] quit",
            mode,
            self.generator,
            self.maze.row_count(),
            self.maze.col_count(),
            self.speed.get(),
            state
        )
    }
}

pub struct App {
    config: Config,
    /// Generators selectable with the number keys, tuned from the config
    generators: [Generator; 3],
    /// Whether the terminal reports key releases
    keyboard_enhanced: bool,
    renderer: Renderer,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let generators = Generator::ALL.map(|g| match (g, config.generator) {
            (Generator::Kruskal { .. }, tuned @ Generator::Kruskal { .. }) => tuned,
            (Generator::RecurBacktrack { .. }, tuned @ Generator::RecurBacktrack { .. }) => tuned,
            _ => g,
        });
        Ok(App {
            config,
            generators,
            keyboard_enhanced: false,
            renderer: Renderer::new(),
        })
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Largest maze that fits a terminal of `cols` x `rows` characters,
    /// leaving one line for the status bar.
    pub fn fit_to_terminal(config_rows: u8, config_cols: u8, (cols, rows): (u16, u16)) -> (u8, u8) {
        let max_rows = rows.saturating_sub(2) / 2;
        let max_cols = (cols / Tile::WIDTH).saturating_sub(1) / 2;
        let fit = |wanted: u8, max: u16| {
            (wanted as u16)
                .min(max)
                .clamp(Maze::MIN_DIMENSION as u16, u8::MAX as u16) as u8
        };
        (fit(config_rows, max_rows), fit(config_cols, max_cols))
    }

    fn enable_key_releases(&mut self) -> std::io::Result<()> {
        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            let mut stdout = std::io::stdout();
            queue!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            stdout.flush()?;
        }
        tracing::info!(
            "[app] Key release events {}",
            if self.keyboard_enhanced {
                "enabled"
            } else {
                "unavailable, treating arrow keys as taps"
            }
        );
        Ok(())
    }

    fn disable_key_releases(&mut self) -> std::io::Result<()> {
        if self.keyboard_enhanced {
            let mut stdout = std::io::stdout();
            queue!(stdout, PopKeyboardEnhancementFlags)?;
            stdout.flush()?;
            self.keyboard_enhanced = false;
        }
        Ok(())
    }

    /// Run the game until the user quits.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.enable_key_releases()?;
        let result = self.main_loop();
        self.disable_key_releases()?;
        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {

        let (rows, cols) =
            App::fit_to_terminal(self.config.rows, self.config.cols, terminal::size()?);
        if (rows, cols) != (self.config.rows, self.config.cols) {
            tracing::warn!(
                "[app] Requested {}x{} maze does not fit the terminal, using {}x{}",
                self.config.rows,
                self.config.cols,
                rows,
                cols
            );
        }
        let mut session = Session::new(rows, cols, &self.config)?;
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.fps as f64);
        tracing::info!("[app] Started main loop at {} fps", self.config.fps);

        loop {
            let deadline = Instant::now() + frame_duration;
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, &mut session)? == Flow::Quit {
                            tracing::info!("[app] Exiting main loop");
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => self.renderer.invalidate(),
                    _ => {}
                }
            }

            session.advance(!self.keyboard_enhanced)?;
            let frame = Frame::compose(&session.maze, session.bot.as_ref(), session.player.as_ref());
            self.renderer.draw(frame, &session.status(self.config.mode))?;
        }
    }

    fn arrow_direction(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> anyhow::Result<Flow> {
        if let Some(dir) = App::arrow_direction(key.code) {
            if let Some(player) = session.player.as_mut() {
                match key.kind {
                    KeyEventKind::Release => player.key_up(dir),
                    KeyEventKind::Press | KeyEventKind::Repeat => player.key_down(dir),
                }
            }
            return Ok(Flow::Continue);
        }
        if key.kind == KeyEventKind::Release {
            return Ok(Flow::Continue);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Flow::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Flow::Quit);
            }
            KeyCode::Char(' ') => {
                session.paused = !session.paused;
                tracing::debug!("[app] Paused: {}", session.paused);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => session.change_speed(session.speed.faster()),
            KeyCode::Char('-') | KeyCode::Char('_') => session.change_speed(session.speed.slower()),
            KeyCode::Char('r') => session.reset(),
            KeyCode::Char('n') => {
                session.regenerate(&self.config)?;
                self.renderer.invalidate();
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as u8 - b'1') as usize;
                session.generator = self.generators[index];
                session.regenerate(&self.config)?;
                self.renderer.invalidate();
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: GameMode) -> Config {
        Config {
            rows: 8,
            cols: 10,
            mode,
            seed: Some(5),
            ..Config::default()
        }
    }

    #[test]
    fn test_fit_to_terminal() {
        // 80x24 terminal: 11 rows of cells (23 lines) and 19 columns (78 chars)
        assert_eq!(App::fit_to_terminal(40, 40, (80, 24)), (11, 19));
        assert_eq!(App::fit_to_terminal(5, 6, (80, 24)), (5, 6));
        // Never below the minimum, even on a tiny terminal
        assert_eq!(App::fit_to_terminal(40, 40, (4, 3)), (2, 2));
    }

    #[test]
    fn test_generators_keep_configured_tuning() {
        let app = App::new(Config {
            generator: Generator::Kruskal { bias: 0.7 },
            ..Config::default()
        })
        .unwrap();
        assert_eq!(app.generators[0], Generator::Bsp);
        assert_eq!(app.generators[1], Generator::Kruskal { bias: 0.7 });
        assert_eq!(
            app.generators[2],
            Generator::RecurBacktrack { straightness: 0.5 }
        );
    }

    #[test]
    fn test_modes_pick_actors() {
        let watch = Session::new(8, 10, &config(GameMode::Watch)).unwrap();
        assert!(watch.bot.is_some() && watch.player.is_none());
        let play = Session::new(8, 10, &config(GameMode::Play)).unwrap();
        assert!(play.bot.is_none() && play.player.is_some());
        let race = Session::new(8, 10, &config(GameMode::Race)).unwrap();
        assert!(race.bot.is_some() && race.player.is_some());
    }

    #[test]
    fn test_watch_session_ends_with_bot_escape() {
        let config = Config {
            speed: Speed::MAX,
            ..config(GameMode::Watch)
        };
        let mut session = Session::new(8, 10, &config).unwrap();
        for _ in 0..4 * session.maze.len() {
            session.advance(true).unwrap();
            if session.outcome.is_some() {
                break;
            }
        }
        assert_eq!(session.outcome, Some(Outcome::BotEscaped));
        let frames = session.frames;
        // Nothing moves once the run is over
        session.advance(true).unwrap();
        assert_eq!(session.frames, frames);
        assert!(session.status(GameMode::Watch).contains("found the exit"));

        session.reset();
        assert_eq!(session.outcome, None);
        assert_eq!(session.maze.trail_count(), 0);
    }

    #[test]
    fn test_pause_stops_actors() {
        let mut session = Session::new(8, 10, &config(GameMode::Watch)).unwrap();
        session.paused = true;
        session.advance(true).unwrap();
        assert_eq!(session.frames, 0);
        let (row, col) = session.maze.start();
        assert_eq!(
            session.bot.as_ref().unwrap().position(),
            (row as f64, col as f64)
        );
    }

    #[test]
    fn test_tapped_key_moves_one_cell() {
        let config = Config {
            speed: Speed::new(7),
            ..config(GameMode::Play)
        };
        let mut session = Session::new(8, 10, &config).unwrap();
        let (row, col) = session.maze.start();
        let player = session.player.as_mut().unwrap();
        // Any open direction from the start
        let dir = Direction::ALL
            .into_iter()
            .find(|&d| !session.maze.is_blocked(row, col, d))
            .unwrap();
        player.key_down(dir);

        session.advance(true).unwrap();
        let player = session.player.as_ref().unwrap();
        assert_eq!(player.active_key(), None);
        assert!(!player.is_aligned());

        session.advance(true).unwrap();
        session.advance(true).unwrap();
        let player = session.player.as_ref().unwrap();
        let (dr, dc) = dir.delta();
        assert_eq!(
            player.position(),
            ((row as i16 + dr as i16) as f64, (col as i16 + dc as i16) as f64)
        );
    }

    #[test]
    fn test_speed_change_reaches_actors() {
        let mut session = Session::new(8, 10, &config(GameMode::Race)).unwrap();
        session.change_speed(Speed::MAX);
        assert_eq!(session.speed, Speed::MAX);
        // Both actors are aligned at the start, so the new speed applies at once
        session.advance(true).unwrap();
        assert!(session.bot.as_ref().unwrap().is_aligned());
    }
}
