use rand::{Rng, SeedableRng, rngs::StdRng};

mod bsp;
mod disjoint_set;
mod kruskal;
mod recur_backtrack;
mod visited;

pub use bsp::binary_space_partition;
pub use disjoint_set::DisjointSet;
pub use kruskal::{Edge, enumerate_edges, randomized_kruskal};
pub use recur_backtrack::recursive_backtrack;
pub use visited::VisitedSet;

use crate::{
    error::MazeError,
    maze::{Direction, Maze, Portal},
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Generator {
    /// Recursive binary space partition.
    Bsp,
    /// Randomized spanning-tree merge. `bias` in `[-1, 1]` favours horizontal
    /// corridors when positive and vertical ones when negative.
    Kruskal { bias: f64 },
    /// Randomized depth-first backtracking. `straightness` in `[0, 1]` is the
    /// probability of carrying on in the same direction when possible.
    RecurBacktrack { straightness: f64 },
}

impl Generator {
    /// One of each generator with neutral tuning.
    pub const ALL: [Generator; 3] = [
        Generator::Bsp,
        Generator::Kruskal { bias: 0.0 },
        Generator::RecurBacktrack { straightness: 0.5 },
    ];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Bsp => write!(f, "Binary Space Partition"),
            Generator::Kruskal { .. } => write!(f, "Kruskal's Algorithm"),
            Generator::RecurBacktrack { .. } => write!(f, "Recursive Backtracking"),
        }
    }
}

/// Carve `maze` with the chosen algorithm, replacing any previous walls and
/// trail marks.
pub fn generate_maze(
    maze: &mut Maze,
    generator: Generator,
    seed: Option<u64>,
) -> Result<(), MazeError> {
    let mut rng = get_rng(seed);
    let started = std::time::Instant::now();
    maze.clear_trails();

    match generator {
        Generator::Bsp => binary_space_partition(maze, &mut rng),
        Generator::Kruskal { bias } => randomized_kruskal(maze, bias, &mut rng),
        Generator::RecurBacktrack { straightness } => {
            recursive_backtrack(maze, straightness, &mut rng)?
        }
    }

    tracing::debug!(
        "[generator] {} carved a {}x{} maze with {} passages in {:?}",
        generator,
        maze.row_count(),
        maze.col_count(),
        maze.open_passage_count(),
        started.elapsed()
    );
    Ok(())
}

/// Open an entrance and an exit on two opposite perimeter edges.
///
/// The pair of edges (left/right or top/bottom), the position along each edge
/// and which edge gets the entrance are all chosen uniformly.
pub fn create_entrance_exit<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    let last_row = maze.row_count() - 1;
    let last_col = maze.col_count() - 1;

    let (mut first, mut second) = if rng.random_bool(0.5) {
        (
            Portal {
                row: rng.random_range(0..=last_row),
                col: 0,
                side: Direction::Left,
            },
            Portal {
                row: rng.random_range(0..=last_row),
                col: last_col,
                side: Direction::Right,
            },
        )
    } else {
        (
            Portal {
                row: 0,
                col: rng.random_range(0..=last_col),
                side: Direction::Up,
            },
            Portal {
                row: last_row,
                col: rng.random_range(0..=last_col),
                side: Direction::Down,
            },
        )
    };
    if rng.random_bool(0.5) {
        std::mem::swap(&mut first, &mut second);
    }
    maze.open_portals(first, second);
}


#[cfg(test)]
mod tests {
    use super::test_support::assert_perfect_maze;
    use super::*;

    #[test]
    fn test_every_generator_produces_a_perfect_maze() {
        for generator in Generator::ALL {
            for (rows, cols) in [(2, 2), (2, 7), (5, 5), (9, 4), (17, 23)] {
                for seed in 0..5 {
                    let mut maze = Maze::new(rows, cols);
                    generate_maze(&mut maze, generator, Some(seed)).unwrap();
                    assert_perfect_maze(&maze);
                }
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        for generator in Generator::ALL {
            let mut a = Maze::new(12, 12);
            let mut b = Maze::new(12, 12);
            generate_maze(&mut a, generator, Some(7)).unwrap();
            generate_maze(&mut b, generator, Some(7)).unwrap();
            for row in 0..12 {
                for col in 0..12 {
                    assert_eq!(a.cell(row, col), b.cell(row, col));
                }
            }
            assert_eq!(a.entrance(), b.entrance());
        }
    }

    #[test]
    fn test_regeneration_clears_trails() {
        let mut maze = Maze::new(4, 4);
        maze.set_trail(1, 1, true);
        generate_maze(&mut maze, Generator::Bsp, Some(3)).unwrap();
        assert_eq!(maze.trail_count(), 0);
    }

    #[test]
    fn test_entrance_and_exit_on_opposite_edges() {
        let mut rng = get_rng(Some(11));
        for _ in 0..50 {
            let mut maze = Maze::new(6, 8);
            maze.fill_walls();
            create_entrance_exit(&mut maze, &mut rng);
            assert_eq!(maze.entrance().side.opposite(), maze.exit().side);
            assert_eq!(test_support::perimeter_openings(&maze), 2);
        }
    }
}
