//! Same-owner connectivity graph over cell indices.
//!
//! A disjoint-set forest with path compression. Linking is incremental as
//! pieces land; removing a piece dissolves only the component it belonged to
//! and hands the survivors back to the grid to be re-linked, so the graph
//! never goes stale after captures or moves.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clusters {
    parent: Vec<usize>,
    size: Vec<usize>,
    linked: Vec<bool>,
}

impl Clusters {
    pub fn new(len: usize) -> Self {
        Clusters {
            parent: (0..len).collect(),
            size: vec![1; len],
            linked: vec![false; len],
        }
    }

    /// Whether `index` currently takes part in the graph.
    pub fn contains(&self, index: usize) -> bool {
        self.linked.get(index).copied().unwrap_or(false)
    }

    /// Add `index` as a singleton component. No-op if already present.
    pub fn insert(&mut self, index: usize) {
        if self.contains(index) {
            return;
        }
        self.parent[index] = index;
        self.size[index] = 1;
        self.linked[index] = true;
    }

    /// Root of the component containing `index`, without compressing.
    pub fn find(&self, index: usize) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        Some(root)
    }

    fn find_compress(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = index;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the components of `a` and `b` (union by size).
    pub fn union(&mut self, a: usize, b: usize) {
        if !self.contains(a) || !self.contains(b) {
            return;
        }
        let ra = self.find_compress(a);
        let rb = self.find_compress(b);
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    /// Number of cells in the component of `index`, 0 if it is not linked.
    pub fn component_size(&self, index: usize) -> usize {
        self.find(index).map_or(0, |root| self.size[root])
    }

    pub fn connected(&self, a: usize, b: usize) -> bool {
        match (self.find(a), self.find(b)) {
            (Some(ra), Some(rb)) => ra == rb,
            _ => false,
        }
    }

    /// Drop `index` from the graph. Every other member of its old component is
    /// reset to a singleton and returned; the caller must re-link them.
    pub fn detach(&mut self, index: usize) -> Vec<usize> {
        let Some(root) = self.find(index) else {
            return Vec::new();
        };
        let members: Vec<usize> = (0..self.parent.len())
            .filter(|&i| self.find(i) == Some(root))
            .collect();
        for &m in &members {
            self.parent[m] = m;
            self.size[m] = 1;
        }
        self.linked[index] = false;
        members.into_iter().filter(|&m| m != index).collect()
    }

    pub fn clear(&mut self) {
        for i in 0..self.parent.len() {
            self.parent[i] = i;
            self.size[i] = 1;
            self.linked[i] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_merges_components() {
        let mut c = Clusters::new(10);
        for i in [1, 2, 3] {
            c.insert(i);
        }
        c.union(1, 2);
        assert!(c.connected(1, 2));
        assert!(!c.connected(1, 3));
        assert_eq!(c.component_size(2), 2);
        c.union(2, 3);
        assert_eq!(c.component_size(1), 3);
    }

    #[test]
    fn test_unlinked_cells_are_never_connected() {
        let mut c = Clusters::new(4);
        c.insert(0);
        c.union(0, 1);
        assert!(!c.connected(0, 1));
        assert_eq!(c.component_size(1), 0);
        assert_eq!(c.component_size(0), 1);
    }

    #[test]
    fn test_detach_returns_survivors_as_singletons() {
        let mut c = Clusters::new(5);
        for i in 0..4 {
            c.insert(i);
        }
        c.union(0, 1);
        c.union(1, 2);
        c.union(2, 3);
        let mut survivors = c.detach(1);
        survivors.sort();
        assert_eq!(survivors, vec![0, 2, 3]);
        assert!(!c.contains(1));
        for s in survivors {
            assert_eq!(c.component_size(s), 1, "survivor {s} should be reset");
        }
    }

    #[test]
    fn test_detach_leaves_other_components_alone() {
        let mut c = Clusters::new(6);
        for i in 0..6 {
            c.insert(i);
        }
        c.union(0, 1);
        c.union(3, 4);
        c.union(4, 5);
        c.detach(0);
        assert_eq!(c.component_size(5), 3);
        assert!(c.connected(3, 5));
    }

    #[test]
    fn test_clear_unlinks_everything() {
        let mut c = Clusters::new(3);
        c.insert(0);
        c.insert(1);
        c.union(0, 1);
        c.clear();
        assert!(!c.contains(0));
        assert!(!c.connected(0, 1));
    }
}
