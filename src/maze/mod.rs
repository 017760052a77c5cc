pub mod cell;
mod grid;

pub use cell::{Cell, Direction};
use grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An opening in the maze perimeter: the cell it belongs to and the side of
/// that cell which faces the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub row: u8,
    pub col: u8,
    pub side: Direction,
}

pub struct Maze {
    grid: Grid,
    entrance: Portal,
    exit: Portal,
}

impl Maze {
    /// Smallest number of rows or columns a maze can have.
    pub const MIN_DIMENSION: u8 = 2;

    /// Creates a new maze with the given number of rows and columns and no walls.
    /// Dimensions below [`Maze::MIN_DIMENSION`] are clamped up.
    ///
    /// Until a generator places them, the entrance is on the left of the top-left
    /// cell and the exit on the right of the bottom-right cell.
    pub fn new(row_count: u8, col_count: u8) -> Self {
        let rows = row_count.max(Maze::MIN_DIMENSION);
        let cols = col_count.max(Maze::MIN_DIMENSION);
        if (rows, cols) != (row_count, col_count) {
            tracing::warn!(
                "[maze] Requested size {}x{} clamped to {}x{}",
                row_count,
                col_count,
                rows,
                cols
            );
        }
        Maze {
            grid: Grid::new(rows, cols, Cell::default()),
            entrance: Portal {
                row: 0,
                col: 0,
                side: Direction::Left,
            },
            exit: Portal {
                row: rows - 1,
                col: cols - 1,
                side: Direction::Right,
            },
        }
    }

    pub fn row_count(&self) -> u8 {
        self.grid.row_count()
    }

    pub fn col_count(&self) -> u8 {
        self.grid.col_count()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn is_in_bounds(&self, coord: (u8, u8)) -> bool {
        coord.0 < self.row_count() && coord.1 < self.col_count()
    }

    fn assert_in_bounds(&self, row: u8, col: u8) {
        if !self.is_in_bounds((row, col)) {
            panic!(
                "The coordinate ({}, {}) is out of bounds for a {}x{} maze",
                row,
                col,
                self.row_count(),
                self.col_count()
            );
        }
    }

    /// Flattened index of a cell: `row * col_count + col`.
    pub fn index_of(&self, row: u8, col: u8) -> usize {
        self.assert_in_bounds(row, col);
        self.grid.ravel_index(row, col)
    }

    pub fn coord_of(&self, index: usize) -> (u8, u8) {
        if index >= self.len() {
            panic!("Cell index {} is out of bounds", index);
        }
        self.grid.unravel_index(index)
    }

    /// The in-bounds cell one step from `(row, col)` in direction `dir`, if any.
    pub fn neighbor(&self, row: u8, col: u8, dir: Direction) -> Option<(u8, u8)> {
        let (dr, dc) = dir.delta();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        self.is_in_bounds((r, c)).then_some((r, c))
    }

    pub fn cell(&self, row: u8, col: u8) -> Cell {
        self.assert_in_bounds(row, col);
        self.grid.cell(row, col)
    }

    pub fn has_wall(&self, row: u8, col: u8, side: Direction) -> bool {
        self.assert_in_bounds(row, col);
        self.grid.has_wall(row, col, side)
    }

    /// Sets or removes the wall on `side` of a cell. Interior walls are mirrored
    /// onto the neighbouring cell; perimeter walls only affect this cell.
    ///
    /// # Panics
    /// If `(row, col)` is out of bounds.
    pub fn set_wall(&mut self, row: u8, col: u8, side: Direction, present: bool) {
        self.assert_in_bounds(row, col);
        self.grid.set_wall_bit(row, col, side, present);
        if let Some((nr, nc)) = self.neighbor(row, col, side) {
            self.grid.set_wall_bit(nr, nc, side.opposite(), present);
        }
    }

    /// Sets (or opens) a continuous vertical wall between columns `left_col` and
    /// `right_col`, from `start_row` to `end_row` inclusive.
    ///
    /// Pass `-1` as `left_col` for the left perimeter and `col_count` as
    /// `right_col` for the right perimeter.
    ///
    /// # Panics
    /// * If `left_col + 1 != right_col`
    /// * If either column is outside `-1..=col_count`
    /// * If `start_row > end_row` or `end_row` is out of bounds
    pub fn set_vertical_wall(
        &mut self,
        left_col: i16,
        right_col: i16,
        start_row: u8,
        end_row: u8,
        present: bool,
    ) {
        let cols = self.col_count() as i16;
        if left_col + 1 != right_col {
            panic!(
                "Columns {} and {} are not adjacent, cannot place a vertical wall",
                left_col, right_col
            );
        }
        if left_col < -1 || right_col > cols {
            panic!(
                "Vertical wall between columns {} and {} is outside the maze",
                left_col, right_col
            );
        }
        if start_row > end_row || end_row >= self.row_count() {
            panic!(
                "The row range (start={}, end={}) for a vertical wall is invalid",
                start_row, end_row
            );
        }
        for row in start_row..=end_row {
            if left_col >= 0 {
                self.grid
                    .set_wall_bit(row, left_col as u8, Direction::Right, present);
            }
            if right_col < cols {
                self.grid
                    .set_wall_bit(row, right_col as u8, Direction::Left, present);
            }
        }
    }

    /// Sets (or opens) a continuous horizontal wall between rows `top_row` and
    /// `bot_row`, from `start_col` to `end_col` inclusive.
    ///
    /// Pass `-1` as `top_row` for the top perimeter and `row_count` as `bot_row`
    /// for the bottom perimeter.
    ///
    /// # Panics
    /// * If `top_row + 1 != bot_row`
    /// * If either row is outside `-1..=row_count`
    /// * If `start_col > end_col` or `end_col` is out of bounds
    pub fn set_horizontal_wall(
        &mut self,
        start_col: u8,
        end_col: u8,
        top_row: i16,
        bot_row: i16,
        present: bool,
    ) {
        let rows = self.row_count() as i16;
        if top_row + 1 != bot_row {
            panic!(
                "Rows {} and {} are not adjacent, cannot place a horizontal wall",
                top_row, bot_row
            );
        }
        if top_row < -1 || bot_row > rows {
            panic!(
                "Horizontal wall between rows {} and {} is outside the maze",
                top_row, bot_row
            );
        }
        if start_col > end_col || end_col >= self.col_count() {
            panic!(
                "The column range (start={}, end={}) for a horizontal wall is invalid",
                start_col, end_col
            );
        }
        for col in start_col..=end_col {
            if top_row >= 0 {
                self.grid
                    .set_wall_bit(top_row as u8, col, Direction::Down, present);
            }
            if bot_row < rows {
                self.grid
                    .set_wall_bit(bot_row as u8, col, Direction::Up, present);
            }
        }
    }

    /// Closes every wall, perimeter included.
    pub fn fill_walls(&mut self) {
        self.grid.fill_walls(Cell::WALLS);
    }

    /// Removes every wall, perimeter included.
    pub fn clear_walls(&mut self) {
        self.grid.fill_walls(0);
    }

    /// Closes the four perimeter walls, leaving the interior untouched.
    pub fn set_perimeter(&mut self) {
        let last_row = self.row_count() - 1;
        let last_col = self.col_count() - 1;
        let rows = self.row_count() as i16;
        let cols = self.col_count() as i16;
        self.set_vertical_wall(-1, 0, 0, last_row, true);
        self.set_vertical_wall(cols - 1, cols, 0, last_row, true);
        self.set_horizontal_wall(0, last_col, -1, 0, true);
        self.set_horizontal_wall(0, last_col, rows - 1, rows, true);
    }

    /// Checks that the portal's side actually faces the outside of the maze.
    fn is_perimeter_side(&self, portal: &Portal) -> bool {
        self.is_in_bounds((portal.row, portal.col))
            && self.neighbor(portal.row, portal.col, portal.side).is_none()
    }

    /// Opens the entrance and exit in the perimeter and records them.
    ///
    /// # Panics
    /// If either portal is not on a perimeter side of an in-bounds cell.
    pub fn open_portals(&mut self, entrance: Portal, exit: Portal) {
        for portal in [&entrance, &exit] {
            if !self.is_perimeter_side(portal) {
                panic!("{:?} is not on the maze perimeter", portal);
            }
        }
        self.grid
            .set_wall_bit(entrance.row, entrance.col, entrance.side, false);
        self.grid.set_wall_bit(exit.row, exit.col, exit.side, false);
        tracing::debug!("[maze] Entrance at {:?}, exit at {:?}", entrance, exit);
        self.entrance = entrance;
        self.exit = exit;
    }

    pub fn entrance(&self) -> Portal {
        self.entrance
    }

    pub fn exit(&self) -> Portal {
        self.exit
    }

    /// The cell agents start in.
    pub fn start(&self) -> (u8, u8) {
        (self.entrance.row, self.entrance.col)
    }

    /// The direction agents initially face: away from the entrance opening,
    /// into the maze.
    pub fn start_direction(&self) -> Direction {
        self.entrance.side.opposite()
    }

    pub fn is_entrance(&self, row: u8, col: u8) -> bool {
        (row, col) == (self.entrance.row, self.entrance.col)
    }

    pub fn is_exit(&self, row: u8, col: u8) -> bool {
        (row, col) == (self.exit.row, self.exit.col)
    }

    /// Whether a step from `(row, col)` in `dir` is impossible, either because of
    /// a wall or because it would leave the grid through a portal.
    pub fn is_blocked(&self, row: u8, col: u8, dir: Direction) -> bool {
        self.has_wall(row, col, dir) || self.neighbor(row, col, dir).is_none()
    }

    pub fn is_on_trail(&self, row: u8, col: u8) -> bool {
        self.assert_in_bounds(row, col);
        self.grid.has_trail(row, col)
    }

    pub fn set_trail(&mut self, row: u8, col: u8, present: bool) {
        self.assert_in_bounds(row, col);
        self.grid.set_trail_bits(row, col, present);
    }

    pub fn clear_trails(&mut self) {
        self.grid.clear_trails();
    }

    /// Number of cells currently marked as lying on a trail.
    pub fn trail_count(&self) -> usize {
        self.grid.trail_count()
    }

    /// Number of open walls between pairs of adjacent cells.
    pub fn open_passage_count(&self) -> usize {
        (0..self.row_count())
            .flat_map(|row| (0..self.col_count()).map(move |col| (row, col)))
            .map(|(row, col)| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&dir| {
                        self.neighbor(row, col, dir).is_some() && !self.has_wall(row, col, dir)
                    })
                    .count()
            })
            .sum()
    }
}
