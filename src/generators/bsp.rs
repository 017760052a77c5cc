use rand::Rng;

use crate::{
    generators::create_entrance_exit,
    maze::{Maze, Orientation},
};

/// Regions with a side shorter than this get a flatter orientation bias,
/// which favours long thin corridors.
const SMALL_REGION: u8 = 6;
/// Chance that a wall parallel to its parent's continues the snake pattern.
const SNAKE_PROBABILITY: f64 = 0.75;

/// Inclusive cell bounds of a partition.
#[derive(Debug, Clone, Copy)]
struct Region {
    left_col: u8,
    right_col: u8,
    top_row: u8,
    bot_row: u8,
}

/// What a partition passes down to its two halves.
#[derive(Debug, Clone, Copy)]
struct Split {
    orientation: Orientation,
    /// Whether the next parallel wall should get its hole at the high end
    /// (right or bottom) to keep the corridor snaking.
    next_hole_high: bool,
}

/// Build a maze by recursively splitting the grid with walls that each have a
/// single hole, starting from an empty interior inside a closed perimeter.
pub fn binary_space_partition<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    maze.clear_walls();
    maze.set_perimeter();
    create_entrance_exit(maze, rng);

    let region = Region {
        left_col: 0,
        right_col: maze.col_count() - 1,
        top_row: 0,
        bot_row: maze.row_count() - 1,
    };
    let split = Split {
        orientation: Orientation::Vertical,
        next_hole_high: rng.random_bool(0.5),
    };
    divide(maze, region, split, rng);
}

fn divide<R: Rng + ?Sized>(maze: &mut Maze, region: Region, parent: Split, rng: &mut R) {
    let d_width = region.right_col - region.left_col;
    let d_height = region.bot_row - region.top_row;

    // A single cell cannot be split
    if d_width == 0 && d_height == 0 {
        return;
    }

    let orientation = if d_width == 0 {
        Orientation::Horizontal
    } else if d_height == 0 {
        Orientation::Vertical
    } else {
        choose_orientation(d_width + 1, d_height + 1, rng)
    };

    match orientation {
        Orientation::Horizontal => {
            // The wall goes between `wall_row` and the row below it
            let wall_row = region.top_row + split_offset(d_height, rng);
            let (hole, next_hole_high) =
                pick_hole(region.left_col, region.right_col, parent, orientation, rng);

            let top = wall_row as i16;
            maze.set_horizontal_wall(region.left_col, region.right_col, top, top + 1, true);
            maze.set_horizontal_wall(hole, hole, top, top + 1, false);

            let split = Split {
                orientation,
                next_hole_high,
            };
            divide(
                maze,
                Region {
                    bot_row: wall_row,
                    ..region
                },
                split,
                rng,
            );
            divide(
                maze,
                Region {
                    top_row: wall_row + 1,
                    ..region
                },
                split,
                rng,
            );
        }
        Orientation::Vertical => {
            // The wall goes between `wall_col` and the column to its right
            let wall_col = region.left_col + split_offset(d_width, rng);
            let (hole, next_hole_high) =
                pick_hole(region.top_row, region.bot_row, parent, orientation, rng);

            let left = wall_col as i16;
            maze.set_vertical_wall(left, left + 1, region.top_row, region.bot_row, true);
            maze.set_vertical_wall(left, left + 1, hole, hole, false);

            let split = Split {
                orientation,
                next_hole_high,
            };
            divide(
                maze,
                Region {
                    right_col: wall_col,
                    ..region
                },
                split,
                rng,
            );
            divide(
                maze,
                Region {
                    left_col: wall_col + 1,
                    ..region
                },
                split,
                rng,
            );
        }
    }
}

/// Pick the orientation of the next wall for a region of `width` x `height`
/// cells, favouring walls that cut the longer dimension.
fn choose_orientation<R: Rng + ?Sized>(width: u8, height: u8, rng: &mut R) -> Orientation {
    let mut p_vertical = width as f64 / (width as f64 + height as f64);
    if width.min(height) < SMALL_REGION {
        p_vertical = 0.5 + (p_vertical - 0.5) * 0.5;
    }
    if rng.random_bool(p_vertical) {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// Offset of a wall line in `0..span`, drawn from the mean of two uniforms so
/// walls cluster toward the middle of the region.
fn split_offset<R: Rng + ?Sized>(span: u8, rng: &mut R) -> u8 {
    let t = (rng.random::<f64>() + rng.random::<f64>()) / 2.0;
    ((t * span as f64) as u8).min(span - 1)
}

/// Choose a hole in `lo..=hi` and where the next parallel hole should go.
fn pick_hole<R: Rng + ?Sized>(
    lo: u8,
    hi: u8,
    parent: Split,
    orientation: Orientation,
    rng: &mut R,
) -> (u8, bool) {
    if parent.orientation == orientation && rng.random_bool(SNAKE_PROBABILITY) {
        let hole = if parent.next_hole_high { hi } else { lo };
        return (hole, !parent.next_hole_high);
    }
    let hole = rng.random_range(lo..=hi);
    (hole, hole - lo <= (hi - lo) / 2)
}
