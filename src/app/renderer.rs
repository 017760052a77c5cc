use std::{
    fmt,
    io::{Stdout, Write},
};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    agents::{Actor, Player, WallFollower},
    maze::{Direction, Maze},
};

/// One symbol of the drawn maze. Cells and the walls between them each take
/// one tile, so a maze of `r` x `c` cells is drawn as `(2r + 1)` x `(2c + 1)` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Trail,
    Entrance,
    Exit,
    Bot,
    Player,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Empty => "  ".with(Color::Reset),
            Tile::Trail => "• ".with(Color::Red),
            Tile::Entrance => "🟩".with(Color::Green),
            Tile::Exit => "🟥".with(Color::Red),
            Tile::Bot => "🟡".with(Color::Yellow),
            Tile::Player => "🔵".with(Color::Cyan),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Lattice of tiles for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    tiles: Vec<Tile>,
    width: u16,
    height: u16,
}

impl Frame {
    /// Lay out walls, portals, the bot's trail and the agents.
    pub fn compose(maze: &Maze, bot: Option<&WallFollower>, player: Option<&Player>) -> Self {
        let width = maze.col_count() as u16 * 2 + 1;
        let height = maze.row_count() as u16 * 2 + 1;
        let mut frame = Frame {
            tiles: vec![Tile::Wall; width as usize * height as usize],
            width,
            height,
        };

        for row in 0..maze.row_count() {
            for col in 0..maze.col_count() {
                let (y, x) = Frame::cell_tile(row, col);
                let tile = if maze.is_on_trail(row, col) {
                    Tile::Trail
                } else {
                    Tile::Empty
                };
                frame.set(y, x, tile);
                for dir in Direction::ALL {
                    if maze.has_wall(row, col, dir) {
                        continue;
                    }
                    let (dy, dx) = dir.delta();
                    let wall = (y.wrapping_add_signed(dy as i16), x.wrapping_add_signed(dx as i16));
                    let neighbor_on_trail = maze
                        .neighbor(row, col, dir)
                        .is_some_and(|(r, c)| maze.is_on_trail(r, c));
                    let tile = if tile == Tile::Trail && neighbor_on_trail {
                        Tile::Trail
                    } else {
                        Tile::Empty
                    };
                    frame.set(wall.0, wall.1, tile);
                }
            }
        }

        for (portal, tile) in [(maze.entrance(), Tile::Entrance), (maze.exit(), Tile::Exit)] {
            let (y, x) = Frame::cell_tile(portal.row, portal.col);
            let (dy, dx) = portal.side.delta();
            frame.set(
                y.wrapping_add_signed(dy as i16),
                x.wrapping_add_signed(dx as i16),
                tile,
            );
        }

        if let Some(bot) = bot {
            frame.place_actor(bot.position(), Tile::Bot);
        }
        // The player is drawn last so it stays on top
        if let Some(player) = player {
            frame.place_actor(player.position(), Tile::Player);
        }
        frame
    }

    fn cell_tile(row: u8, col: u8) -> (u16, u16) {
        (row as u16 * 2 + 1, col as u16 * 2 + 1)
    }

    fn set(&mut self, y: u16, x: u16, tile: Tile) {
        if y < self.height && x < self.width {
            self.tiles[y as usize * self.width as usize + x as usize] = tile;
        }
    }

    pub fn get(&self, y: u16, x: u16) -> Tile {
        self.tiles[y as usize * self.width as usize + x as usize]
    }

    /// Snap a fractional position to the nearest tile; halfway between two
    /// cells lands on the wall tile between them.
    fn place_actor(&mut self, (row, col): (f64, f64), tile: Tile) {
        let y = (row * 2.0 + 1.0).round() as u16;
        let x = (col * 2.0 + 1.0).round() as u16;
        self.set(y, x, tile);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Last frame drawn, used to redraw only the tiles that changed
    previous: Option<Frame>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            previous: None,
        }
    }

    /// Forget the last frame so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn draw(&mut self, frame: Frame, status: &str) -> std::io::Result<()> {
        match &self.previous {
            Some(previous) if previous.width == frame.width && previous.height == frame.height => {
                for y in 0..frame.height {
                    for x in 0..frame.width {
                        let tile = frame.get(y, x);
                        if previous.get(y, x) != tile {
                            queue!(
                                self.stdout,
                                cursor::MoveTo(x * Tile::WIDTH, y),
                                style::Print(tile)
                            )?;
                        }
                    }
                }
            }
            _ => {
                queue!(
                    self.stdout,
                    terminal::Clear(ClearType::All),
                    cursor::MoveTo(0, 0)
                )?;
                for y in 0..frame.height {
                    for x in 0..frame.width {
                        queue!(self.stdout, style::Print(frame.get(y, x)))?;
                    }
                    queue!(self.stdout, style::Print("\r\n"))?;
                }
            }
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, frame.height),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Cyan)),
        )?;
        self.stdout.flush()?;
        self.previous = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agents::{Speed, WallFollower},
        maze::Portal,
    };

    #[test]
    fn test_frame_layout() {
        let mut maze = Maze::new(2, 2);
        maze.fill_walls();
        maze.set_wall(0, 0, Direction::Right, false);
        maze.open_portals(
            Portal {
                row: 0,
                col: 0,
                side: Direction::Left,
            },
            Portal {
                row: 1,
                col: 1,
                side: Direction::Down,
            },
        );
        let frame = Frame::compose(&maze, None, None);
        assert_eq!((frame.width(), frame.height()), (5, 5));
        assert_eq!(frame.get(1, 1), Tile::Empty);
        assert_eq!(frame.get(1, 2), Tile::Empty);
        assert_eq!(frame.get(2, 1), Tile::Wall);
        assert_eq!(frame.get(1, 0), Tile::Entrance);
        assert_eq!(frame.get(4, 3), Tile::Exit);
        assert_eq!(frame.get(0, 0), Tile::Wall);
    }

    #[test]
    fn test_trail_and_bot_are_drawn() {
        let mut maze = Maze::new(2, 3);
        maze.fill_walls();
        maze.set_wall(0, 0, Direction::Right, false);
        maze.set_wall(0, 1, Direction::Right, false);
        maze.open_portals(
            Portal {
                row: 0,
                col: 0,
                side: Direction::Left,
            },
            Portal {
                row: 0,
                col: 2,
                side: Direction::Right,
            },
        );
        let mut bot = WallFollower::new(&maze, Speed::new(7));
        // Half way from (0, 0) to (0, 1)
        bot.step(&mut maze).unwrap();
        let frame = Frame::compose(&maze, Some(&bot), None);
        assert_eq!(frame.get(1, 1), Tile::Trail);
        assert_eq!(frame.get(1, 2), Tile::Bot);

        bot.step(&mut maze).unwrap();
        bot.step(&mut maze).unwrap();
        let frame = Frame::compose(&maze, Some(&bot), None);
        // Both cells trailed, so the passage between them is too
        assert_eq!(frame.get(1, 2), Tile::Trail);
        assert_eq!(frame.get(1, 3), Tile::Trail);
    }
}
