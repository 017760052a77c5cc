/// Union-find over cell indices.
pub struct DisjointSet {
    parent: Vec<u32>,
    num_sets: usize,
}

impl DisjointSet {
    /// One singleton set per element.
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size as u32).collect(),
            num_sets: size,
        }
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Root of the tree containing `x`. Every node on the way is repointed
    /// directly at the root.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }

        let mut node = x;
        while node != root {
            let next = self.parent[node] as usize;
            self.parent[node] = root as u32;
            node = next;
        }
        root
    }

    /// Join the sets of `x` and `y`, making the root of `y` a child of the root
    /// of `x`. Returns `false` without mutating anything if they already share a set.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        self.parent[root_y] = root_x as u32;
        self.num_sets -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_counts_sets() {
        let mut sets = DisjointSet::new(5);
        assert_eq!(sets.num_sets(), 5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert_eq!(sets.num_sets(), 3);
        // No-op unions leave the count alone
        assert!(!sets.union(1, 0));
        assert!(!sets.union(4, 4));
        assert_eq!(sets.num_sets(), 3);
        assert!(sets.union(1, 4));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(2), sets.find(0));
        assert_eq!(sets.num_sets(), 2);
    }

    #[test]
    fn test_second_root_joins_first() {
        let mut sets = DisjointSet::new(4);
        sets.union(2, 3);
        assert_eq!(sets.find(3), 2);
        sets.union(0, 3);
        assert_eq!(sets.find(2), 0);
    }

    #[test]
    fn test_find_compresses_path() {
        let mut sets = DisjointSet::new(4);
        // Build the chain 3 -> 2 -> 1 -> 0
        sets.union(2, 3);
        sets.union(1, 2);
        sets.union(0, 1);
        assert_eq!(sets.parent[3], 2);
        assert_eq!(sets.find(3), 0);
        assert!(sets.parent.iter().all(|&p| p == 0));
    }
}
