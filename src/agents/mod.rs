mod bot;
mod player;
mod trail;

pub use bot::WallFollower;
pub use player::Player;
pub use trail::TrailStack;

use crate::{
    error::MazeError,
    maze::{Direction, Maze},
};

/// Positions are fixed-point with this many substeps per cell.
pub const SUBSTEPS: i32 = 256;

/// Movement speed, 1 (slowest) to 8 (one cell per frame).
///
/// At speed `s` an agent moves `2^s / 256` of a cell per frame, so it always
/// lands exactly on a cell after `256 / 2^s` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(8);

    /// Out-of-range values are clamped.
    pub fn new(speed: i64) -> Self {
        Speed(speed.clamp(Speed::MIN.0 as i64, Speed::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Substeps moved per frame.
    pub fn unit_movement(self) -> i32 {
        1 << self.0
    }

    /// Frames needed to cross one cell.
    pub fn frames_per_cell(self) -> u32 {
        (SUBSTEPS >> self.0) as u32
    }

    pub fn faster(self) -> Self {
        Speed::new(self.0 as i64 + 1)
    }

    pub fn slower(self) -> Self {
        Speed::new(self.0 as i64 - 1)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(5)
    }
}

/// Something that moves through a maze one frame at a time.
pub trait Actor {
    /// Advance by one frame.
    fn step(&mut self, maze: &mut Maze) -> Result<(), MazeError>;
    /// Return to the entrance, facing into the maze.
    fn reset(&mut self, maze: &mut Maze);
    /// Fractional `(row, col)`.
    fn position(&self) -> (f64, f64);
    fn direction(&self) -> Option<Direction>;
    /// Takes effect the next time the actor is aligned with a cell.
    fn notify_speed_change(&mut self, speed: Speed);
    fn is_aligned(&self) -> bool;

    /// Whether the actor is parked on the exit cell.
    fn has_finished(&self, maze: &Maze) -> bool {
        let (row, col) = self.position();
        self.is_aligned() && maze.is_exit(row as u8, col as u8)
    }
}

/// Fixed-point position plus speed bookkeeping shared by both actors.
#[derive(Debug, Clone)]
struct Motion {
    row: i32,
    col: i32,
    unit_movement: i32,
    pending_speed: Option<Speed>,
}

impl Motion {
    fn new(cell: (u8, u8), speed: Speed) -> Self {
        let mut motion = Motion {
            row: 0,
            col: 0,
            unit_movement: speed.unit_movement(),
            pending_speed: None,
        };
        motion.place(cell);
        motion
    }

    fn place(&mut self, (row, col): (u8, u8)) {
        self.row = row as i32 * SUBSTEPS;
        self.col = col as i32 * SUBSTEPS;
    }

    fn is_aligned(&self) -> bool {
        self.row % SUBSTEPS == 0 && self.col % SUBSTEPS == 0
    }

    /// The cell the agent sits on, if it is aligned.
    fn cell(&self) -> Option<(u8, u8)> {
        self.is_aligned()
            .then(|| ((self.row / SUBSTEPS) as u8, (self.col / SUBSTEPS) as u8))
    }

    fn position(&self) -> (f64, f64) {
        (
            self.row as f64 / SUBSTEPS as f64,
            self.col as f64 / SUBSTEPS as f64,
        )
    }

    fn apply_pending_speed(&mut self) {
        if let Some(speed) = self.pending_speed.take() {
            self.unit_movement = speed.unit_movement();
        }
    }

    fn walk(&mut self, dir: Direction) {
        let (dr, dc) = dir.delta();
        self.row += dr as i32 * self.unit_movement;
        self.col += dc as i32 * self.unit_movement;
    }
}
