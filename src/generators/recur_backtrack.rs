use rand::Rng;

use crate::{
    error::MazeError,
    generators::{VisitedSet, create_entrance_exit},
    maze::{Direction, Maze},
};

/// Carve a maze with a randomized depth-first walk from a random cell.
///
/// `straightness` is the probability of carrying on in the direction that
/// reached the current cell when that neighbour is still unvisited.
pub fn recursive_backtrack<R: Rng + ?Sized>(
    maze: &mut Maze,
    straightness: f64,
    rng: &mut R,
) -> Result<(), MazeError> {
    let straightness = if straightness.is_finite() {
        straightness.clamp(0.0, 1.0)
    } else {
        0.0
    };

    maze.fill_walls();
    create_entrance_exit(maze, rng);

    let total_cells = maze.len();
    let mut visited = VisitedSet::new(total_cells);
    // Each entry is a cell on the current walk and the direction used to reach it
    let mut stack: Vec<(usize, Option<Direction>)> = Vec::with_capacity(total_cells);

    let start = rng.random_range(0..total_cells);
    visited.insert(start);
    stack.push((start, None));
    let mut unvisited = total_cells - 1;

    while unvisited > 0 {
        let Some(&(index, came_from)) = stack.last() else {
            return Err(MazeError::BacktrackExhausted { unvisited });
        };
        let (row, col) = maze.coord_of(index);

        let candidates = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                maze.neighbor(row, col, dir)
                    .map(|(r, c)| (dir, maze.index_of(r, c)))
            })
            .filter(|&(_, idx)| !visited.contains(idx))
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            stack.pop();
            if stack.is_empty() {
                return Err(MazeError::BacktrackExhausted { unvisited });
            }
            continue;
        }

        let straight = came_from
            .filter(|_| rng.random_bool(straightness))
            .and_then(|dir| candidates.iter().find(|&&(d, _)| d == dir));
        let &(dir, next) = match straight {
            Some(candidate) => candidate,
            None => &candidates[rng.random_range(0..candidates.len())],
        };

        maze.set_wall(row, col, dir, false);
        visited.insert(next);
        stack.push((next, Some(dir)));
        unvisited -= 1;
    }

    tracing::debug!(
        "[generator] Backtracking visited {} cells, walk depth {} at finish",
        visited.len(),
        stack.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{get_rng, test_support::assert_perfect_maze};

    /// Cells whose only two openings are on opposite sides.
    fn straight_cells(maze: &Maze) -> usize {
        let mut count = 0;
        for row in 0..maze.row_count() {
            for col in 0..maze.col_count() {
                let open = |dir| !maze.is_blocked(row, col, dir);
                let horizontal = open(Direction::Left) && open(Direction::Right);
                let vertical = open(Direction::Up) && open(Direction::Down);
                if maze.cell(row, col).wall_count() == 2 && (horizontal || vertical) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_backtracking_is_a_spanning_tree() {
        for straightness in [0.0, 0.3, 1.0] {
            for seed in 0..10 {
                let mut maze = Maze::new(7, 13);
                recursive_backtrack(&mut maze, straightness, &mut get_rng(Some(seed))).unwrap();
                assert_perfect_maze(&maze);
            }
        }
    }

    #[test]
    fn test_straightness_lengthens_corridors() {
        let mut twisty = Maze::new(25, 25);
        recursive_backtrack(&mut twisty, 0.0, &mut get_rng(Some(3))).unwrap();
        let mut straight = Maze::new(25, 25);
        recursive_backtrack(&mut straight, 1.0, &mut get_rng(Some(3))).unwrap();
        assert!(straight_cells(&straight) > straight_cells(&twisty));
    }

    #[test]
    fn test_invalid_straightness_is_tolerated() {
        let mut maze = Maze::new(5, 5);
        recursive_backtrack(&mut maze, -3.0, &mut get_rng(Some(1))).unwrap();
        assert_perfect_maze(&maze);
        recursive_backtrack(&mut maze, f64::NAN, &mut get_rng(Some(1))).unwrap();
        assert_perfect_maze(&maze);
    }
}
