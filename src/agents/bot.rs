use crate::{
    agents::{Actor, Motion, Speed, TrailStack},
    error::MazeError,
    maze::{Direction, Maze},
};

/// Maze runner that keeps its left hand on the wall.
///
/// The bot leaves a trail behind it. Walking back over its own trail erases
/// it, so the trail is always the bot's current path from the entrance, and
/// it is kept both as trail bits in the maze and in a [`TrailStack`].
pub struct WallFollower {
    motion: Motion,
    direction: Direction,
    /// Last cell the bot was aligned with.
    prev: (u8, u8),
    trail: TrailStack,
}

impl WallFollower {
    pub fn new(maze: &Maze, speed: Speed) -> Self {
        let start = maze.start();
        WallFollower {
            motion: Motion::new(start, speed),
            direction: maze.start_direction(),
            prev: start,
            trail: TrailStack::new(maze.len()),
        }
    }

    pub fn trail(&self) -> &TrailStack {
        &self.trail
    }

    /// Update the trail for the move from `self.prev` into `curr`.
    /// Precondition: the bot is aligned with `curr`.
    fn update_trail(&mut self, maze: &mut Maze, curr: (u8, u8)) -> Result<(), MazeError> {
        let prev = self.prev;
        let prev_has_trail = maze.is_on_trail(prev.0, prev.1);
        let curr_has_trail = maze.is_on_trail(curr.0, curr.1);

        match (prev_has_trail, curr_has_trail) {
            // Walking back over the trail: erase the cell we just left
            (true, true) => {
                maze.set_trail(prev.0, prev.1, false);
                let popped = self.trail.pop();
                debug_assert_eq!(popped, Some(maze.index_of(prev.0, prev.1)));
            }
            // Extending the trail into new territory
            (true, false) => {
                maze.set_trail(curr.0, curr.1, true);
                self.trail.push(maze.index_of(curr.0, curr.1));
            }
            // The bot always stands on its own trail once it has moved
            (false, true) => {
                tracing::error!("[bot] Entered trailed cell {:?} from untrailed {:?}", curr, prev);
                return Err(MazeError::TrailDesync {
                    row: curr.0,
                    col: curr.1,
                });
            }
            // First step after a reset: root the trail where we stand
            (false, false) => {
                maze.set_trail(prev.0, prev.1, true);
                self.trail.push(maze.index_of(prev.0, prev.1));
            }
        }
        Ok(())
    }

    /// Left-hand rule: try left, straight, right, then back.
    fn find_direction(&self, maze: &Maze, row: u8, col: u8) -> Result<Direction, MazeError> {
        let mut dir = self.direction.ccw();
        for _ in 0..4 {
            if !maze.is_blocked(row, col, dir) {
                return Ok(dir);
            }
            dir = dir.cw();
        }
        tracing::error!("[bot] Trapped at ({}, {})", row, col);
        Err(MazeError::Trapped { row, col })
    }
}

impl Actor for WallFollower {
    /// Between cells the bot keeps going. On a cell it applies any pending speed
    /// change, updates its trail, picks a direction and sets off. On the exit it
    /// stays put.
    fn step(&mut self, maze: &mut Maze) -> Result<(), MazeError> {
        let Some((row, col)) = self.motion.cell() else {
            self.motion.walk(self.direction);
            return Ok(());
        };
        if maze.is_exit(row, col) {
            return Ok(());
        }

        self.motion.apply_pending_speed();
        self.update_trail(maze, (row, col))?;
        self.prev = (row, col);
        self.direction = self.find_direction(maze, row, col)?;
        self.motion.walk(self.direction);
        Ok(())
    }

    fn reset(&mut self, maze: &mut Maze) {
        while let Some(index) = self.trail.pop() {
            let (row, col) = maze.coord_of(index);
            maze.set_trail(row, col, false);
        }
        let start = maze.start();
        self.motion.place(start);
        self.prev = start;
        self.direction = maze.start_direction();
        tracing::debug!("[bot] Reset to {:?} facing {}", start, self.direction);
    }

    fn position(&self) -> (f64, f64) {
        self.motion.position()
    }

    fn direction(&self) -> Option<Direction> {
        Some(self.direction)
    }

    fn notify_speed_change(&mut self, speed: Speed) {
        self.motion.pending_speed = Some(speed);
    }

    fn is_aligned(&self) -> bool {
        self.motion.is_aligned()
    }
}
