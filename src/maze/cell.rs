use std::fmt;

/// A cardinal direction, doubling as the name of a cell side.
///
/// The variants form a ring in counter-clockwise order (facing left, a
/// counter-clockwise turn faces down), so rotations are additions modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Down,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    fn from_ring(index: u8) -> Self {
        Direction::ALL[(index % 4) as usize]
    }

    fn ring(self) -> u8 {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }

    /// Rotate 90° counter-clockwise.
    pub fn ccw(self) -> Self {
        Direction::from_ring(self.ring() + 1)
    }

    /// Rotate 90° clockwise.
    pub fn cw(self) -> Self {
        Direction::from_ring(self.ring() + 3)
    }

    pub fn opposite(self) -> Self {
        Direction::from_ring(self.ring() + 2)
    }

    /// Row and column deltas of one step in this direction.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
        }
    }

    /// Bit of the wall nibble that stores the wall on this side of a cell.
    pub(crate) fn wall_mask(self) -> u8 {
        match self {
            Direction::Left => Cell::LEFT,
            Direction::Right => Cell::RIGHT,
            Direction::Up => Cell::TOP,
            Direction::Down => Cell::BOTTOM,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Down => write!(f, "down"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
        }
    }
}

/// Unpacked view of one grid cell.
///
/// The grid stores each cell as a single byte: the low nibble holds the wall
/// flags (left, right, top, bottom from high to low bit) and the high nibble
/// is the trail marker, fully set or fully clear.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
    pub on_trail: bool,
}

impl Cell {
    pub(crate) const LEFT: u8 = 0b1000;
    pub(crate) const RIGHT: u8 = 0b0100;
    pub(crate) const TOP: u8 = 0b0010;
    pub(crate) const BOTTOM: u8 = 0b0001;
    pub(crate) const WALLS: u8 = 0b0000_1111;
    pub(crate) const TRAIL: u8 = 0b1111_0000;

    /// A cell closed on all four sides.
    pub const CLOSED: Cell = Cell {
        left: true,
        right: true,
        top: true,
        bottom: true,
        on_trail: false,
    };

    pub fn from_bits(bits: u8) -> Self {
        Cell {
            left: bits & Cell::LEFT != 0,
            right: bits & Cell::RIGHT != 0,
            top: bits & Cell::TOP != 0,
            bottom: bits & Cell::BOTTOM != 0,
            on_trail: bits & Cell::TRAIL != 0,
        }
    }

    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.left {
            bits |= Cell::LEFT;
        }
        if self.right {
            bits |= Cell::RIGHT;
        }
        if self.top {
            bits |= Cell::TOP;
        }
        if self.bottom {
            bits |= Cell::BOTTOM;
        }
        if self.on_trail {
            bits |= Cell::TRAIL;
        }
        bits
    }

    pub fn has_wall(&self, side: Direction) -> bool {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.top,
            Direction::Down => self.bottom,
        }
    }

    /// Number of walls around the cell.
    pub fn wall_count(&self) -> usize {
        Direction::ALL.iter().filter(|&&d| self.has_wall(d)).count()
    }
}
