//! Virtualized layout for variable-height rows
//!
//! Only the rows intersecting the viewport (plus an overscan margin) are
//! materialized. Row heights are not known until a row has been rendered, so
//! layout follows a two-phase protocol:
//!
//! 1. [`Virtualizer::request_render`] hands out the best-known size for a
//!    position (measured if available, otherwise the configured estimate)
//! 2. after rendering, [`Virtualizer::report_measured_size`] feeds the real
//!    size back and every later offset shifts accordingly
//!
//! Measurements are keyed by row identity, not by position, so a row keeps
//! its measured size when a query re-ranks it. A measurement is replaced only
//! by a new measurement or dropped by [`Virtualizer::invalidate`] (content
//! edits) and when the row leaves the display order.

mod fenwick;

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::model::StableIndex;

use fenwick::FenwickTree;

/// Default size for rows that have never been measured (text lines)
pub const DEFAULT_ESTIMATED_SIZE: u32 = 4;
/// Default number of extra rows rendered beyond each viewport edge
pub const DEFAULT_OVERSCAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualizerOptions {
    /// Size assumed for rows that have not been measured yet
    pub estimate_size: u32,
    /// Rows rendered beyond each edge of the viewport
    pub overscan: usize,
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self {
            estimate_size: DEFAULT_ESTIMATED_SIZE,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// One materialized entry of the visible window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualItem {
    /// Position in the display order
    pub position: usize,
    /// Row shown at that position
    pub id: StableIndex,
    /// Absolute offset of the row's top edge
    pub offset: u64,
    /// Best-known size of the row
    pub size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Virtualizer {
    options: VirtualizerOptions,
    /// Row identity at each display position
    keys: Vec<StableIndex>,
    /// Best-known size at each display position
    sizes: Vec<u32>,
    /// Authoritative sizes for rows that have been rendered
    measured: HashMap<StableIndex, u32>,
    tree: FenwickTree,
}

impl Virtualizer {
    pub fn new(options: VirtualizerOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> VirtualizerOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Point the virtualizer at a new display order
    ///
    /// Measurements for rows no longer shown are dropped.
    pub fn set_keys(&mut self, keys: &[StableIndex]) {
        self.keys = keys.to_vec();

        let shown: HashSet<StableIndex> = self.keys.iter().copied().collect();
        let before = self.measured.len();
        self.measured.retain(|id, _| shown.contains(id));
        if self.measured.len() != before {
            tracing::trace!(
                dropped = before - self.measured.len(),
                "dropped measurements for rows no longer shown"
            );
        }

        self.rebuild();
    }

    fn rebuild(&mut self) {
        let estimate = self.options.estimate_size;
        self.sizes = self
            .keys
            .iter()
            .map(|id| self.measured.get(id).copied().unwrap_or(estimate))
            .collect();
        let values: Vec<u64> = self.sizes.iter().map(|&s| u64::from(s)).collect();
        self.tree = FenwickTree::from_values(&values);
    }

    /// Row identity at a display position
    pub fn key_at(&self, position: usize) -> Option<StableIndex> {
        self.keys.get(position).copied()
    }

    /// Best-known size of a position
    pub fn size_of(&self, position: usize) -> Option<u32> {
        self.sizes.get(position).copied()
    }

    pub fn is_measured(&self, position: usize) -> bool {
        self.keys
            .get(position)
            .is_some_and(|id| self.measured.contains_key(id))
    }

    pub fn measured_count(&self) -> usize {
        self.measured.len()
    }

    /// Offset of a position's top edge (sum of all prior sizes)
    ///
    /// Positions past the end report the total extent.
    pub fn offset_of(&self, position: usize) -> u64 {
        self.tree.prefix(position)
    }

    /// Sum of every position's best-known size
    pub fn total_extent(&self) -> u64 {
        self.tree.total()
    }

    pub fn max_scroll_offset(&self, viewport_size: u32) -> u64 {
        self.total_extent().saturating_sub(u64::from(viewport_size))
    }

    pub fn item(&self, position: usize) -> Option<VirtualItem> {
        let id = self.key_at(position)?;
        Some(VirtualItem {
            position,
            id,
            offset: self.offset_of(position),
            size: self.sizes[position],
        })
    }

    /// Phase one of measurement: the size to lay a position out with
    pub fn request_render(&self, position: usize) -> Option<u32> {
        self.size_of(position)
    }

    /// Phase two of measurement: record a rendered position's real size
    ///
    /// Returns `true` when layout changed (offsets after `position` moved).
    pub fn report_measured_size(&mut self, position: usize, size: u32) -> bool {
        let Some(id) = self.key_at(position) else {
            tracing::debug!(position, "measurement for out-of-range position ignored");
            return false;
        };

        self.measured.insert(id, size);

        let old = self.sizes[position];
        if old == size {
            return false;
        }
        self.sizes[position] = size;
        if size > old {
            self.tree.add(position, u64::from(size - old));
        } else {
            self.tree.sub(position, u64::from(old - size));
        }
        tracing::trace!(position, %id, old, size, "row size corrected");
        true
    }

    /// Forget a row's measurement so it is measured again on next render
    ///
    /// Returns `true` when a measurement was dropped.
    pub fn invalidate(&mut self, id: StableIndex) -> bool {
        if self.measured.remove(&id).is_none() {
            return false;
        }
        if let Some(position) = self.keys.iter().position(|&key| key == id) {
            let estimate = self.options.estimate_size;
            let old = self.sizes[position];
            self.sizes[position] = estimate;
            if estimate > old {
                self.tree.add(position, u64::from(estimate - old));
            } else {
                self.tree.sub(position, u64::from(old - estimate));
            }
        }
        true
    }

    /// Forget every measurement (e.g. after the column widths changed)
    pub fn clear_measurements(&mut self) {
        self.measured.clear();
        self.rebuild();
    }

    /// Positions intersecting `[scroll_offset, scroll_offset + viewport_size]`
    /// without overscan
    pub fn visible_range(&self, scroll_offset: u64, viewport_size: u32) -> Range<usize> {
        let len = self.len();
        if len == 0 {
            return 0..0;
        }

        let first = self.tree.find(scroll_offset).min(len - 1);
        let last = if viewport_size == 0 {
            first
        } else {
            let end = scroll_offset.saturating_add(u64::from(viewport_size));
            // last position whose top edge lies before the viewport's end
            self.tree.find(end - 1).min(len - 1).max(first)
        };

        first..last + 1
    }

    /// The visible range extended by the overscan margin, clamped to bounds
    pub fn window_range(&self, scroll_offset: u64, viewport_size: u32) -> Range<usize> {
        let visible = self.visible_range(scroll_offset, viewport_size);
        if visible.is_empty() {
            return visible;
        }
        let overscan = self.options.overscan;
        let start = visible.start.saturating_sub(overscan);
        let end = visible.end.saturating_add(overscan).min(self.len());
        start..end
    }

    /// Materialize the visible window
    pub fn visible_window(&self, scroll_offset: u64, viewport_size: u32) -> Vec<VirtualItem> {
        let range = self.window_range(scroll_offset, viewport_size);
        let mut items = Vec::with_capacity(range.len());
        let mut offset = self.offset_of(range.start);
        for position in range {
            let size = self.sizes[position];
            items.push(VirtualItem {
                position,
                id: self.keys[position],
                offset,
                size,
            });
            offset += u64::from(size);
        }
        items
    }

    /// Smallest scroll change that brings `position` fully into view
    ///
    /// Rows taller than the viewport are aligned to their top edge.
    pub fn scroll_offset_to_reveal(
        &self,
        position: usize,
        scroll_offset: u64,
        viewport_size: u32,
    ) -> u64 {
        let Some(item) = self.item(position) else {
            return scroll_offset;
        };
        let viewport_end = scroll_offset.saturating_add(u64::from(viewport_size));

        if item.offset < scroll_offset || u64::from(item.size) > u64::from(viewport_size) {
            item.offset
        } else if item.end() > viewport_end {
            item.end() - u64::from(viewport_size)
        } else {
            scroll_offset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<StableIndex> {
        (0..n).map(StableIndex).collect()
    }

    fn virtualizer(n: usize, estimate: u32, overscan: usize) -> Virtualizer {
        let mut v = Virtualizer::new(VirtualizerOptions {
            estimate_size: estimate,
            overscan,
        });
        v.set_keys(&keys(n));
        v
    }

    #[test]
    fn test_empty() {
        let v = virtualizer(0, 4, 5);
        assert_eq!(v.total_extent(), 0);
        assert!(v.visible_window(0, 100).is_empty());
        assert!(v.visible_window(500, 0).is_empty());
    }

    #[test]
    fn test_estimated_extent_and_offsets() {
        let v = virtualizer(10, 4, 0);
        assert_eq!(v.total_extent(), 40);
        assert_eq!(v.offset_of(0), 0);
        assert_eq!(v.offset_of(3), 12);
        assert_eq!(v.offset_of(10), 40);
    }

    #[test]
    fn test_visible_range_without_overscan() {
        let v = virtualizer(100, 4, 0);
        // rows 0..=2 cover [0, 12); viewport [0, 10]
        assert_eq!(v.visible_range(0, 10), 0..3);
        // viewport [12, 20] starts exactly at row 3, ends exactly at row 5's top
        assert_eq!(v.visible_range(12, 8), 3..5);
        // viewport in the middle of row 5
        assert_eq!(v.visible_range(22, 1), 5..6);
    }

    #[test]
    fn test_window_overscan_clamped() {
        let v = virtualizer(20, 4, 5);
        assert_eq!(v.window_range(0, 8), 0..7);
        assert_eq!(v.window_range(76, 4), 14..20);
        assert_eq!(v.window_range(40, 4), 5..16);
    }

    #[test]
    fn test_scroll_past_end_shows_last_rows() {
        let v = virtualizer(10, 4, 1);
        assert_eq!(v.visible_range(1_000, 10), 9..10);
        assert_eq!(v.window_range(1_000, 10), 8..10);
    }

    #[test]
    fn test_measurement_shifts_later_offsets() {
        let mut v = virtualizer(5, 4, 0);
        assert!(v.report_measured_size(1, 10));
        assert_eq!(v.offset_of(2), 14);
        assert_eq!(v.total_extent(), 26);
        assert!(v.is_measured(1));
        assert!(!v.is_measured(0));

        // same size again is not a layout change
        assert!(!v.report_measured_size(1, 10));
        // out of range is ignored
        assert!(!v.report_measured_size(9, 3));
    }

    #[test]
    fn test_measurement_follows_row_identity() {
        let mut v = virtualizer(3, 4, 0);
        v.report_measured_size(2, 9);

        // re-rank: row 2 now first
        v.set_keys(&[StableIndex(2), StableIndex(0), StableIndex(1)]);
        assert_eq!(v.size_of(0), Some(9));
        assert_eq!(v.offset_of(1), 9);
    }

    #[test]
    fn test_shrinking_drops_absent_measurements() {
        let mut v = virtualizer(4, 4, 0);
        v.report_measured_size(3, 7);
        v.report_measured_size(0, 2);

        v.set_keys(&[StableIndex(0)]);
        assert_eq!(v.len(), 1);
        assert_eq!(v.measured_count(), 1);
        assert_eq!(v.total_extent(), 2);

        // row 3 comes back unmeasured
        v.set_keys(&keys(4));
        assert_eq!(v.size_of(3), Some(4));
    }

    #[test]
    fn test_invalidate_restores_estimate() {
        let mut v = virtualizer(3, 4, 0);
        v.report_measured_size(1, 12);
        assert!(v.invalidate(StableIndex(1)));
        assert_eq!(v.size_of(1), Some(4));
        assert_eq!(v.total_extent(), 12);
        assert!(!v.invalidate(StableIndex(1)));
    }

    #[test]
    fn test_request_render_follows_measurement() {
        let mut v = virtualizer(3, 4, 0);
        assert_eq!(v.request_render(1), Some(4));

        v.report_measured_size(1, 7);
        assert_eq!(v.request_render(1), Some(7));
        assert_eq!(v.request_render(0), Some(4));

        v.invalidate(StableIndex(1));
        assert_eq!(v.request_render(1), Some(4));
        assert_eq!(v.request_render(3), None);
    }

    #[test]
    fn test_window_offsets_are_contiguous() {
        let mut v = virtualizer(30, 3, 2);
        for (p, size) in [(4, 1), (5, 6), (6, 2), (9, 5)] {
            v.report_measured_size(p, size);
        }
        let items = v.visible_window(15, 10);
        for pair in items.windows(2) {
            assert_eq!(pair[0].position + 1, pair[1].position);
            assert_eq!(pair[0].end(), pair[1].offset);
        }
        for item in &items {
            assert_eq!(item.offset, v.offset_of(item.position));
        }
    }

    #[test]
    fn test_scroll_offset_to_reveal() {
        let v = virtualizer(20, 4, 0);
        // already visible
        assert_eq!(v.scroll_offset_to_reveal(1, 0, 10), 0);
        // below viewport: align bottom
        assert_eq!(v.scroll_offset_to_reveal(5, 0, 10), 14);
        // above viewport: align top
        assert_eq!(v.scroll_offset_to_reveal(2, 40, 10), 8);
        // out of range: unchanged
        assert_eq!(v.scroll_offset_to_reveal(99, 7, 10), 7);
    }

    #[test]
    fn test_scroll_offset_to_reveal_near_max_offset() {
        let v = virtualizer(20, 4, 0);
        assert_eq!(v.scroll_offset_to_reveal(0, u64::MAX - 1, 10), 0);
        assert_eq!(v.scroll_offset_to_reveal(19, u64::MAX - 1, 10), 76);
        assert_eq!(v.scroll_offset_to_reveal(99, u64::MAX, 10), u64::MAX);
    }
}
