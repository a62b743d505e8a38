//! Drives the `virtualizer` engine over a list of equally tall items: works
//! out which items intersect the viewport and where each one goes, and caches
//! rendered items behind a caller-supplied equality check.
use std::collections::{btree_map::Entry, BTreeMap};
use std::fmt;
use std::ops::{Range, RangeInclusive};
use virtualizer::{VirtualRange, Virtualizer, VirtualizerOptions};

/// Extra items materialized on each side of the viewport
pub(crate) const DEFAULT_OVERSCAN: usize = 2;

/// Position of an item, in lines from the top of the whole list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ItemLayout {
    pub(crate) top: u64,
    pub(crate) height: u16,
}

/// Options for a list of `item_count` items that are each `item_height`
/// lines tall
pub(crate) fn fixed_size_options(item_count: usize, item_height: u16) -> VirtualizerOptions {
    let height = u32::from(item_height.max(1));
    VirtualizerOptions::new(item_count, move |_| height).with_overscan(DEFAULT_OVERSCAN)
}

/// Line offset of the top of item `position` in a list of `item_height`-line
/// items
pub(crate) fn fixed_offset(position: usize, item_height: u16) -> u64 {
    to_u64(position).saturating_mul(u64::from(item_height.max(1)))
}

/// Line-based adapter over a [`Virtualizer`].  The engine owns the item
/// count, overscan, viewport size, and scroll offset; this type converts
/// between its units and the terminal's.
#[derive(Clone)]
pub(crate) struct FixedSizeList {
    engine: Virtualizer,
}

impl FixedSizeList {
    /// Creates the engine from `options`.  The configured initial offset is
    /// clamped to the end of the list.
    pub(crate) fn new(options: VirtualizerOptions) -> Self {
        let mut engine = Virtualizer::new(options);
        engine.set_scroll_offset_clamped(engine.scroll_offset());
        FixedSizeList { engine }
    }

    pub(crate) fn item_count(&self) -> usize {
        self.engine.count()
    }

    pub(crate) fn scroll_offset(&self) -> u64 {
        self.engine.scroll_offset()
    }

    pub(crate) fn viewport_height(&self) -> u16 {
        u16::try_from(self.engine.viewport_size()).unwrap_or(u16::MAX)
    }

    pub(crate) fn set_viewport_height(&mut self, height: u16) {
        self.engine.set_viewport_size(u32::from(height));
        self.engine.set_scroll_offset_clamped(self.engine.scroll_offset());
    }

    /// Scrolls to `offset`, clamped to the list's extent.  Returns `false` if
    /// the offset did not change.
    pub(crate) fn scroll_to(&mut self, offset: u64) -> bool {
        let offset = self.engine.clamp_scroll_offset(offset);
        let moved = offset != self.engine.scroll_offset();
        self.engine.set_scroll_offset(offset);
        moved
    }

    pub(crate) fn scroll_by(&mut self, delta: i64) -> bool {
        let current = self.engine.scroll_offset();
        let offset = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.scroll_to(offset)
    }

    fn item_height(&self, position: usize) -> u32 {
        self.engine
            .item_size(position)
            .unwrap_or_else(|| (self.engine.options().estimate_size)(position))
            .max(1)
    }

    /// Number of whole items that fit in the viewport
    pub(crate) fn items_per_page(&self) -> usize {
        let per_page = self.engine.viewport_size() / self.item_height(0);
        usize::try_from(per_page).unwrap_or(usize::MAX)
    }

    /// Index of the item under the top edge of the viewport, or the item
    /// count if the viewport is past the last item
    fn top_item(&self) -> usize {
        let offset = self.engine.scroll_offset();
        if offset >= self.engine.total_size() {
            return self.engine.count();
        }
        self.engine
            .index_at_offset(offset)
            .unwrap_or_else(|| self.engine.count())
    }

    /// Items intersecting the viewport.  An empty viewport yields an empty
    /// range at the top item.
    pub(crate) fn visible_range(&self) -> Range<usize> {
        if self.engine.viewport_size() == 0 {
            let start = self.top_item();
            return start..start;
        }
        to_range(self.engine.visible_range())
    }

    /// Items intersecting the viewport plus the overscan margin on each side
    pub(crate) fn overscanned_range(&self) -> Range<usize> {
        to_range(self.engine.virtual_range())
    }

    pub(crate) fn item_layout(&self, position: usize) -> ItemLayout {
        let height = self.item_height(position);
        let top = self
            .engine
            .item_start(position)
            .unwrap_or_else(|| to_u64(position).saturating_mul(u64::from(height)));
        ItemLayout {
            top,
            height: u16::try_from(height).unwrap_or(u16::MAX),
        }
    }

    /// Offset of an item's top edge from the top of the viewport
    pub(crate) fn viewport_y(&self, layout: ItemLayout) -> i64 {
        to_i64(layout.top) - to_i64(self.engine.scroll_offset())
    }

    pub(crate) fn offset_of(&self, position: usize) -> u64 {
        self.item_layout(position).top
    }
}

// The engine's own `Debug` output lists every item size.
impl fmt::Debug for FixedSizeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedSizeList")
            .field("item_count", &self.engine.count())
            .field("overscan", &self.engine.options().overscan)
            .field("scroll_offset", &self.engine.scroll_offset())
            .field("viewport_height", &self.engine.viewport_size())
            .finish()
    }
}

/// Rendered items keyed by identity, each stored alongside the inputs it was
/// rendered from.  An item is only rendered again when `are_equal` says its
/// new inputs differ from the stored ones.
#[derive(Clone, Debug)]
pub(crate) struct MemoRows<K, I, T> {
    entries: BTreeMap<K, (I, T)>,
    are_equal: fn(&I, &I) -> bool,
    renders: u64,
}

impl<K: Ord + Copy, I, T> MemoRows<K, I, T> {
    pub(crate) fn new(are_equal: fn(&I, &I) -> bool) -> Self {
        MemoRows {
            entries: BTreeMap::new(),
            are_equal,
            renders: 0,
        }
    }

    pub(crate) fn get_or_render<F>(&mut self, key: K, inputs: I, render: F) -> &T
    where
        F: FnOnce(&I) -> T,
    {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                if !(self.are_equal)(&entry.get().0, &inputs) {
                    let value = render(&inputs);
                    self.renders += 1;
                    entry.insert((inputs, value));
                }
                &entry.into_mut().1
            }
            Entry::Vacant(entry) => {
                let value = render(&inputs);
                self.renders += 1;
                &entry.insert((inputs, value)).1
            }
        }
    }

    /// Total number of times an item has been rendered
    pub(crate) fn renders(&self) -> u64 {
        self.renders
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Forgets every cached item whose key lies outside `keep`
    pub(crate) fn retain_within(&mut self, keep: &RangeInclusive<K>) {
        self.entries.retain(|k, _| keep.contains(k));
    }
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn to_range(range: VirtualRange) -> Range<usize> {
    range.start_index..range.end_index.max(range.start_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> FixedSizeList {
        let mut list =
            FixedSizeList::new(fixed_size_options(1000, 2).with_initial_offset_value(100));
        list.set_viewport_height(10);
        list
    }

    #[test]
    fn test_visible_range() {
        let list = list();
        assert_eq!(list.visible_range(), 50..55);
        assert_eq!(list.overscanned_range(), 48..57);
        assert_eq!(list.items_per_page(), 5);
    }

    #[test]
    fn test_partial_rows_are_visible() {
        let mut list = list();
        assert!(list.scroll_by(1));
        assert_eq!(list.scroll_offset(), 101);
        assert_eq!(list.visible_range(), 50..56);
        assert_eq!(list.viewport_y(list.item_layout(50)), -1);
        assert_eq!(list.viewport_y(list.item_layout(51)), 1);
    }

    #[test]
    fn test_zero_height_viewport_shows_nothing() {
        let mut list = list();
        assert!(list.scroll_by(1));
        list.set_viewport_height(0);
        assert_eq!(list.scroll_offset(), 101);
        assert_eq!(list.visible_range(), 50..50);
        assert!(list.visible_range().is_empty());
        assert_eq!(list.overscanned_range(), 0..0);
        assert_eq!(list.items_per_page(), 0);
    }

    #[test]
    fn test_scroll_clamps_at_ends() {
        let mut list = list();
        assert!(list.scroll_to(0));
        assert!(!list.scroll_by(-1));
        assert_eq!(list.visible_range(), 0..5);
        assert_eq!(list.overscanned_range(), 0..7);
        assert!(list.scroll_to(u64::MAX));
        assert_eq!(list.scroll_offset(), 1990);
        assert!(!list.scroll_by(2));
        assert_eq!(list.visible_range(), 995..1000);
        assert_eq!(list.overscanned_range(), 993..1000);
    }

    #[test]
    fn test_shrinking_list_reclamps_offset() {
        let mut list =
            FixedSizeList::new(fixed_size_options(3, 2).with_initial_offset_value(100));
        assert_eq!(list.scroll_offset(), 6);
        assert_eq!(list.visible_range(), 3..3);
        list.set_viewport_height(4);
        assert_eq!(list.scroll_offset(), 2);
        assert_eq!(list.visible_range(), 1..3);
    }

    #[test]
    fn test_configured_overscan() {
        let mut list = FixedSizeList::new(
            fixed_size_options(1000, 2)
                .with_overscan(5)
                .with_initial_offset_value(100),
        );
        list.set_viewport_height(10);
        assert_eq!(list.overscanned_range(), 45..60);
        assert_eq!(list.viewport_height(), 10);
        assert_eq!(list.item_count(), 1000);
    }

    #[test]
    fn test_empty_list() {
        let mut list = FixedSizeList::new(fixed_size_options(0, 2));
        list.set_viewport_height(10);
        assert_eq!(list.visible_range(), 0..0);
        assert_eq!(list.overscanned_range(), 0..0);
        assert!(!list.scroll_by(4));
    }

    #[test]
    fn test_item_layout() {
        let list = FixedSizeList::new(fixed_size_options(10, 3));
        assert_eq!(list.item_layout(4), ItemLayout { top: 12, height: 3 });
        assert_eq!(list.offset_of(4), 12);
        assert_eq!(fixed_offset(4, 3), 12);
    }


    #[test]
    fn test_memo_skips_equal_inputs() {
        let mut memo = MemoRows::<u32, i32, String>::new(|a, b| a == b);
        assert_eq!(memo.get_or_render(1, 10, |n| n.to_string()), "10");
        assert_eq!(memo.get_or_render(1, 10, |_| String::from("stale")), "10");
        assert_eq!(memo.renders(), 1);
        assert_eq!(memo.get_or_render(1, 11, |n| n.to_string()), "11");
        assert_eq!(memo.get_or_render(2, 11, |n| n.to_string()), "11");
        assert_eq!(memo.renders(), 3);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_memo_uses_supplied_equality() {
        let mut memo = MemoRows::<u32, i32, i32>::new(|a, b| a % 10 == b % 10);
        memo.get_or_render(0, 3, |&n| n);
        assert_eq!(*memo.get_or_render(0, 13, |&n| n), 3);
        assert_eq!(memo.renders(), 1);
    }

    #[test]
    fn test_memo_retain() {
        let mut memo = MemoRows::<u32, (), u32>::new(|_, _| true);
        for k in 0..10 {
            memo.get_or_render(k, (), |_| k);
        }
        memo.retain_within(&(3..=5));
        assert_eq!(memo.len(), 3);
        memo.get_or_render(4, (), |_| 99);
        assert_eq!(memo.renders(), 10);
    }
}
