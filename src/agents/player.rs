use crate::{
    agents::{Actor, Motion, Speed},
    error::MazeError,
    maze::{Direction, Maze},
};

/// Keyboard-driven maze runner.
///
/// Held direction keys are kept in a buffer with the most recently pressed
/// one at the front; the player heads that way whenever it is aligned with a
/// cell. Once it sets off it finishes the move to the next cell.
pub struct Player {
    motion: Motion,
    /// Direction of the move in progress, `None` when standing still.
    heading: Option<Direction>,
    /// Last direction moved or the starting direction, for drawing.
    facing: Direction,
    held_keys: Vec<Direction>,
}

impl Player {
    pub fn new(maze: &Maze, speed: Speed) -> Self {
        Player {
            motion: Motion::new(maze.start(), speed),
            heading: None,
            facing: maze.start_direction(),
            held_keys: Vec::with_capacity(Direction::ALL.len()),
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// A direction key went down. A key that is already held moves to the front.
    pub fn key_down(&mut self, dir: Direction) {
        match self.held_keys.iter().position(|&d| d == dir) {
            Some(0) => {}
            Some(index) => self.held_keys.swap(0, index),
            None => self.held_keys.insert(0, dir),
        }
    }

    pub fn key_up(&mut self, dir: Direction) {
        self.held_keys.retain(|&d| d != dir);
    }

    pub fn release_all(&mut self) {
        self.held_keys.clear();
    }

    /// The key that currently steers the player.
    pub fn active_key(&self) -> Option<Direction> {
        self.held_keys.first().copied()
    }
}

impl Actor for Player {
    fn step(&mut self, maze: &mut Maze) -> Result<(), MazeError> {
        let Some((row, col)) = self.motion.cell() else {
            if let Some(dir) = self.heading {
                self.motion.walk(dir);
            }
            return Ok(());
        };
        if maze.is_exit(row, col) {
            self.heading = None;
            return Ok(());
        }

        self.motion.apply_pending_speed();
        self.heading = self.active_key();
        if let Some(dir) = self.heading {
            self.facing = dir;
            if maze.is_blocked(row, col, dir) {
                self.heading = None;
            } else {
                self.motion.walk(dir);
            }
        }
        Ok(())
    }

    fn reset(&mut self, maze: &mut Maze) {
        self.motion.place(maze.start());
        self.heading = None;
        self.facing = maze.start_direction();
        tracing::debug!("[player] Reset to {:?}", maze.start());
    }

    fn position(&self) -> (f64, f64) {
        self.motion.position()
    }

    fn direction(&self) -> Option<Direction> {
        self.heading
    }

    fn notify_speed_change(&mut self, speed: Speed) {
        self.motion.pending_speed = Some(speed);
    }

    fn is_aligned(&self) -> bool {
        self.motion.is_aligned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Portal;

    fn open_maze() -> Maze {
        let mut maze = Maze::new(3, 3);
        maze.set_perimeter();
        maze.open_portals(
            Portal {
                row: 0,
                col: 0,
                side: Direction::Up,
            },
            Portal {
                row: 2,
                col: 2,
                side: Direction::Down,
            },
        );
        maze
    }

    #[test]
    fn test_latest_key_wins() {
        let maze = open_maze();
        let mut player = Player::new(&maze, Speed::MAX);
        player.key_down(Direction::Down);
        player.key_down(Direction::Right);
        assert_eq!(player.active_key(), Some(Direction::Right));
        // Re-pressing a held key brings it back to the front
        player.key_down(Direction::Down);
        assert_eq!(player.active_key(), Some(Direction::Down));
        player.key_up(Direction::Down);
        assert_eq!(player.active_key(), Some(Direction::Right));
        player.release_all();
        assert_eq!(player.active_key(), None);
    }

    #[test]
    fn test_player_stops_at_walls_and_portals() {
        let mut maze = open_maze();
        let mut player = Player::new(&maze, Speed::MAX);
        assert_eq!(player.facing(), Direction::Down);

        // Out through the entrance is not allowed
        player.key_down(Direction::Up);
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (0.0, 0.0));
        assert_eq!(player.direction(), None);
        assert_eq!(player.facing(), Direction::Up);

        player.release_all();
        player.key_down(Direction::Right);
        player.step(&mut maze).unwrap();
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (0.0, 2.0));
        // Perimeter wall on the right
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (0.0, 2.0));
    }

    #[test]
    fn test_player_finishes_a_move_after_release() {
        let mut maze = open_maze();
        let mut player = Player::new(&maze, Speed::new(7));
        player.key_down(Direction::Down);
        player.step(&mut maze).unwrap();
        player.key_up(Direction::Down);
        assert!(!player.is_aligned());
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (1.0, 0.0));
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (1.0, 0.0));
    }

    #[test]
    fn test_player_parks_on_exit_and_resets() {
        let mut maze = open_maze();
        let mut player = Player::new(&maze, Speed::MAX);
        player.key_down(Direction::Down);
        player.step(&mut maze).unwrap();
        player.step(&mut maze).unwrap();
        player.key_down(Direction::Right);
        player.step(&mut maze).unwrap();
        player.step(&mut maze).unwrap();
        assert!(player.has_finished(&maze));
        player.step(&mut maze).unwrap();
        assert_eq!(player.position(), (2.0, 2.0));
        // The player never leaves a trail
        assert_eq!(maze.trail_count(), 0);

        player.reset(&mut maze);
        assert_eq!(player.position(), (0.0, 0.0));
        assert!(!player.has_finished(&maze));
    }
}
