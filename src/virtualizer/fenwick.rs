//! Fenwick (binary indexed) tree over row sizes
//!
//! Invariants:
//! 1. `prefix(k)` == sum of sizes `[0..k)`
//! 2. `find(offset)` == largest `k` in `[0, len]` with `prefix(k) <= offset`
//!
//! | Operation | Cost     |
//! |-----------|----------|
//! | build     | O(n)     |
//! | add/sub   | O(log n) |
//! | prefix    | O(log n) |
//! | find      | O(log n) |

#[derive(Debug, Clone, Default)]
pub(crate) struct FenwickTree {
    /// 1-based; `tree[0]` is unused
    tree: Vec<u64>,
}

impl FenwickTree {
    pub fn from_values(values: &[u64]) -> Self {
        let n = values.len();
        let mut tree = vec![0u64; n + 1];
        for (i, &v) in values.iter().enumerate() {
            let idx = i + 1;
            tree[idx] += v;
            let parent = idx + lowbit(idx);
            if parent <= n {
                tree[parent] += tree[idx];
            }
        }
        Self { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub fn add(&mut self, index: usize, delta: u64) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += lowbit(i);
        }
    }

    pub fn sub(&mut self, index: usize, delta: u64) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] -= delta;
            i += lowbit(i);
        }
    }

    /// Sum of the first `count` values
    pub fn prefix(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowbit(i);
        }
        sum
    }

    pub fn total(&self) -> u64 {
        self.prefix(self.len())
    }

    /// Largest `k` such that `prefix(k) <= offset`
    pub fn find(&self, offset: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }

        let mut pos = 0;
        let mut remaining = offset;
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        pos
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_sums() {
        let tree = FenwickTree::from_values(&[3, 1, 4, 1, 5]);
        assert_eq!(tree.prefix(0), 0);
        assert_eq!(tree.prefix(1), 3);
        assert_eq!(tree.prefix(3), 8);
        assert_eq!(tree.prefix(5), 14);
        assert_eq!(tree.prefix(99), 14);
        assert_eq!(tree.total(), 14);
    }

    #[test]
    fn test_add_and_sub() {
        let mut tree = FenwickTree::from_values(&[2, 2, 2, 2]);
        tree.add(1, 3);
        assert_eq!(tree.prefix(2), 7);
        assert_eq!(tree.total(), 11);
        tree.sub(3, 2);
        assert_eq!(tree.total(), 9);
        assert_eq!(tree.prefix(3), 9);
    }

    #[test]
    fn test_find() {
        // starts: 0, 3, 4, 8, 9; total 14
        let tree = FenwickTree::from_values(&[3, 1, 4, 1, 5]);
        assert_eq!(tree.find(0), 0);
        assert_eq!(tree.find(2), 0);
        assert_eq!(tree.find(3), 1);
        assert_eq!(tree.find(7), 2);
        assert_eq!(tree.find(8), 3);
        assert_eq!(tree.find(13), 4);
        assert_eq!(tree.find(14), 5);
        assert_eq!(tree.find(1000), 5);
    }

    #[test]
    fn test_find_matches_linear_scan() {
        let values: Vec<u64> = (0..37).map(|i| (i * 7 % 5) + 1).collect();
        let tree = FenwickTree::from_values(&values);
        for offset in 0..=tree.total() + 2 {
            let expected = (0..=values.len())
                .filter(|&k| values[..k].iter().sum::<u64>() <= offset)
                .max()
                .unwrap();
            assert_eq!(tree.find(offset), expected, "offset {}", offset);
        }
    }

    #[test]
    fn test_empty() {
        let tree = FenwickTree::from_values(&[]);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.total(), 0);
        assert_eq!(tree.find(10), 0);
    }
}
