use super::cell::{Cell, Direction};

/// Packed row-major storage: one byte per cell.
pub struct Grid {
    data: Box<[u8]>,
    row_count: u8,
    col_count: u8,
}

impl Grid {
    pub fn new(row_count: u8, col_count: u8, cell: Cell) -> Self {
        let data = vec![cell.bits(); row_count as usize * col_count as usize].into_boxed_slice();
        Grid {
            data,
            row_count,
            col_count,
        }
    }

    pub fn row_count(&self) -> u8 {
        self.row_count
    }

    pub fn col_count(&self) -> u8 {
        self.col_count
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ravel_index(&self, row: u8, col: u8) -> usize {
        row as usize * self.col_count as usize + col as usize
    }

    pub fn unravel_index(&self, index: usize) -> (u8, u8) {
        let cols = self.col_count as usize;
        ((index / cols) as u8, (index % cols) as u8)
    }

    pub fn bits(&self, row: u8, col: u8) -> u8 {
        self.data[self.ravel_index(row, col)]
    }

    pub fn cell(&self, row: u8, col: u8) -> Cell {
        Cell::from_bits(self.bits(row, col))
    }

    pub fn has_wall(&self, row: u8, col: u8, side: Direction) -> bool {
        self.bits(row, col) & side.wall_mask() != 0
    }

    /// Set or clear a single wall flag on one cell, without mirroring.
    pub fn set_wall_bit(&mut self, row: u8, col: u8, side: Direction, present: bool) {
        let idx = self.ravel_index(row, col);
        if present {
            self.data[idx] |= side.wall_mask();
        } else {
            self.data[idx] &= !side.wall_mask();
        }
    }

    pub fn has_trail(&self, row: u8, col: u8) -> bool {
        self.bits(row, col) & Cell::TRAIL != 0
    }

    pub fn set_trail_bits(&mut self, row: u8, col: u8, present: bool) {
        let idx = self.ravel_index(row, col);
        if present {
            self.data[idx] |= Cell::TRAIL;
        } else {
            self.data[idx] &= !Cell::TRAIL;
        }
    }

    /// Overwrite the wall nibble of every cell, keeping trail bits.
    pub fn fill_walls(&mut self, walls: u8) {
        self.data
            .iter_mut()
            .for_each(|bits| *bits = (*bits & Cell::TRAIL) | (walls & Cell::WALLS));
    }

    pub fn clear_trails(&mut self) {
        self.data.iter_mut().for_each(|bits| *bits &= Cell::WALLS);
    }

    pub fn trail_count(&self) -> usize {
        self.data
            .iter()
            .filter(|&&bits| bits & Cell::TRAIL != 0)
            .count()
    }
}
