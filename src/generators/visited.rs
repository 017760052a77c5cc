/// Fixed-capacity bitset over cell indices. Bits are only ever set.
pub struct VisitedSet {
    words: Box<[u64]>,
    capacity: usize,
    count: usize,
}

impl VisitedSet {
    pub fn new(capacity: usize) -> Self {
        VisitedSet {
            words: vec![0; capacity.div_ceil(64)].into_boxed_slice(),
            capacity,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of indices marked so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.capacity, "index {} out of range", index);
        self.words[index / 64] & (1 << (index % 64)) != 0
    }

    /// Mark `index`. Returns `true` if it was not marked before.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.capacity, "index {} out of range", index);
        let word = &mut self.words[index / 64];
        let bit = 1 << (index % 64);
        if *word & bit != 0 {
            return false;
        }
        *word |= bit;
        self.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut visited = VisitedSet::new(130);
        assert!(visited.is_empty());
        assert!(visited.insert(0));
        assert!(visited.insert(64));
        assert!(visited.insert(129));
        assert!(!visited.insert(64));
        assert_eq!(visited.len(), 3);
        assert!(visited.contains(129));
        assert!(!visited.contains(128));
        assert!(!visited.contains(63));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_capacity_panics() {
        let mut visited = VisitedSet::new(10);
        visited.insert(10);
    }
}
