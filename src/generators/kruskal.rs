use rand::Rng;

use crate::{
    generators::{DisjointSet, create_entrance_exit},
    maze::{Direction, Maze},
};

/// Wall between a cell and its left or upper neighbour.
///
/// Only left and top walls are enumerated, so each interior wall appears once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub cell: usize,
    pub side: Direction,
}

impl Edge {
    /// Index of the cell on the other side of the wall.
    fn other(&self, col_count: usize) -> usize {
        match self.side {
            Direction::Up => self.cell - col_count,
            _ => self.cell - 1,
        }
    }
}

/// Every interior wall of a `row_count` x `col_count` grid, row by row.
/// There are `2 * rows * cols - rows - cols` of them.
pub fn enumerate_edges(row_count: u8, col_count: u8) -> Vec<Edge> {
    let cols = col_count as usize;
    let total_cells = row_count as usize * cols;
    let mut edges = Vec::with_capacity(2 * total_cells);
    for cell in 0..total_cells {
        if cell % cols != 0 {
            edges.push(Edge {
                cell,
                side: Direction::Left,
            });
        }
        if cell >= cols {
            edges.push(Edge {
                cell,
                side: Direction::Up,
            });
        }
    }
    edges
}

pub fn randomized_kruskal<R: Rng + ?Sized>(maze: &mut Maze, bias: f64, rng: &mut R) {
    let bias = if bias.is_finite() {
        bias.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    // Positive bias keeps horizontal walls around longer, negative keeps vertical ones
    let disfavored = if bias > 0.0 {
        Direction::Up
    } else {
        Direction::Left
    };

    maze.fill_walls();
    create_entrance_exit(maze, rng);

    let col_count = maze.col_count() as usize;
    let mut sets = DisjointSet::new(maze.len());
    let mut edges = enumerate_edges(maze.row_count(), maze.col_count());
    let total_edges = edges.len();
    let mut removed = 0;

    while sets.num_sets() > 1 {
        let mut i = rng.random_range(0..edges.len());
        if bias != 0.0 && edges[i].side == disfavored && rng.random_bool(bias.abs()) {
            i = rng.random_range(0..edges.len());
        }
        // Whether or not the wall comes down, it never needs checking again
        let edge = edges.swap_remove(i);
        if sets.union(edge.cell, edge.other(col_count)) {
            let (row, col) = maze.coord_of(edge.cell);
            maze.set_wall(row, col, edge.side, false);
            removed += 1;
        }
    }

    tracing::debug!(
        "[generator] Kruskal removed {} of {} candidate walls ({} never drawn)",
        removed,
        total_edges,
        edges.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{get_rng, test_support::assert_perfect_maze};

    fn passage_split(maze: &Maze) -> (usize, usize) {
        let mut horizontal = 0;
        let mut vertical = 0;
        for row in 0..maze.row_count() {
            for col in 0..maze.col_count() {
                if col + 1 < maze.col_count() && !maze.has_wall(row, col, Direction::Right) {
                    horizontal += 1;
                }
                if row + 1 < maze.row_count() && !maze.has_wall(row, col, Direction::Down) {
                    vertical += 1;
                }
            }
        }
        (horizontal, vertical)
    }

    #[test]
    fn test_edge_enumeration() {
        let edges = enumerate_edges(5, 5);
        assert_eq!(edges.len(), 2 * 5 * 5 - 5 - 5);
        assert_eq!(
            edges[0],
            Edge {
                cell: 1,
                side: Direction::Left
            }
        );
        assert!(
            edges
                .iter()
                .all(|e| !(e.side == Direction::Up && e.cell < 5))
        );
        assert!(
            edges
                .iter()
                .all(|e| !(e.side == Direction::Left && e.cell % 5 == 0))
        );
        assert_eq!(enumerate_edges(3, 7).len(), 2 * 3 * 7 - 3 - 7);
    }

    #[test]
    fn test_five_by_five_spanning_tree() {
        let mut maze = Maze::new(5, 5);
        randomized_kruskal(&mut maze, 0.0, &mut get_rng(Some(5)));
        // 24 of the 40 candidate walls come down
        assert_eq!(maze.open_passage_count(), 24);
        assert_perfect_maze(&maze);
    }

    #[test]
    fn test_bias_shapes_corridors() {
        let mut maze = Maze::new(20, 20);
        randomized_kruskal(&mut maze, 1.0, &mut get_rng(Some(1)));
        assert_perfect_maze(&maze);
        let (horizontal, vertical) = passage_split(&maze);
        assert!(horizontal > vertical, "{} <= {}", horizontal, vertical);

        randomized_kruskal(&mut maze, -1.0, &mut get_rng(Some(1)));
        assert_perfect_maze(&maze);
        let (horizontal, vertical) = passage_split(&maze);
        assert!(vertical > horizontal, "{} <= {}", vertical, horizontal);
    }

    #[test]
    fn test_out_of_range_bias_is_clamped() {
        let mut maze = Maze::new(6, 6);
        randomized_kruskal(&mut maze, 42.0, &mut get_rng(Some(2)));
        assert_perfect_maze(&maze);
        randomized_kruskal(&mut maze, f64::NAN, &mut get_rng(Some(2)));
        assert_perfect_maze(&maze);
    }
}
