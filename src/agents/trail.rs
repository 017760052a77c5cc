/// Backing storage, as narrow as the cell count allows.
#[derive(Debug)]
enum Storage {
    Narrow(Vec<u8>),
    Wide(Vec<u16>),
}

/// Fixed-capacity stack of cell indices: the bot's path from the entrance to
/// where it currently stands.
#[derive(Debug)]
pub struct TrailStack {
    storage: Storage,
    capacity: usize,
}

impl TrailStack {
    /// A stack able to hold one entry per cell of a grid with `total_cells` cells.
    ///
    /// # Panics
    /// If `total_cells` does not fit in a `u16` index space.
    pub fn new(total_cells: usize) -> Self {
        let storage = if total_cells <= u8::MAX as usize + 1 {
            Storage::Narrow(Vec::with_capacity(total_cells))
        } else if total_cells <= u16::MAX as usize + 1 {
            Storage::Wide(Vec::with_capacity(total_cells))
        } else {
            panic!("{} cells exceed the trail index range", total_cells);
        };
        TrailStack {
            storage,
            capacity: total_cells,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        match &self.storage {
            Storage::Narrow(v) => v.len(),
            Storage::Wide(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// # Panics
    /// If the stack is already at capacity or `index` is not a valid cell index.
    pub fn push(&mut self, index: usize) {
        assert!(
            self.count() < self.capacity,
            "trail stack overflow: capacity is {}",
            self.capacity
        );
        assert!(index < self.capacity, "cell index {} out of range", index);
        match &mut self.storage {
            Storage::Narrow(v) => v.push(index as u8),
            Storage::Wide(v) => v.push(index as u16),
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        match &mut self.storage {
            Storage::Narrow(v) => v.pop().map(usize::from),
            Storage::Wide(v) => v.pop().map(usize::from),
        }
    }

    /// The most recently pushed index.
    pub fn peek(&self) -> Option<usize> {
        match &self.storage {
            Storage::Narrow(v) => v.last().copied().map(usize::from),
            Storage::Wide(v) => v.last().copied().map(usize::from),
        }
    }

    /// Indices from the bottom of the stack (the entrance) to the top.
    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match &self.storage {
            Storage::Narrow(v) => Box::new(v.iter().map(|&i| usize::from(i))),
            Storage::Wide(v) => Box::new(v.iter().map(|&i| usize::from(i))),
        }
    }
}
