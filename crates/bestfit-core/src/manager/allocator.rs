//! Best-fit allocation over the segment list.
//!
//! The manager keeps every segment (free or allocated) in a
//! [`SegmentList`] and, in parallel, a heap of [`FreeEntry`]
//! snapshots restricted to the free segments, ordered largest-first
//! with ties broken toward the lowest address. The list is the heap's
//! index observer: every heap move writes the entry's new index into
//! `Segment::heap_slot`, and the `NULL_INDEX` notification on removal
//! doubles as the "allocated" mark.
//!
//! An entry snapshot never goes stale because a segment's bounds are
//! only mutated after it has been popped or erased from the heap.

use std::cmp::Reverse;
use std::fmt;
use std::mem;

use crate::heap::{IndexObserver, IndexedHeap, NULL_INDEX};
use crate::manager::segment::{Segment, SegmentId, SegmentList};

/// Snapshot of a free segment as stored in the free view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeEntry {
    left: u64,
    right: u64,
    id: SegmentId,
}

impl FreeEntry {
    fn of(id: SegmentId, segment: &Segment) -> Self {
        Self {
            left: segment.left,
            right: segment.right,
            id,
        }
    }

    fn size(&self) -> u64 {
        self.right + 1 - self.left
    }
}

/// Larger segments first; among equal sizes, the leftmost wins.
fn free_order(a: &FreeEntry, b: &FreeEntry) -> bool {
    (a.size(), Reverse(a.left)) > (b.size(), Reverse(b.left))
}

impl IndexObserver<FreeEntry> for SegmentList {
    fn index_changed(&mut self, entry: &FreeEntry, new_index: usize) {
        self.segment_mut(entry.id).heap_slot = new_index;
    }
}

/// What a [`ManagerEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Allocate,
    Free,
    Merge,
}

/// Lifecycle record appended per allocate/free decision.
///
/// Plain data; serialization is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerEvent {
    /// Monotonic decision id.
    pub sequence: u64,
    /// Event kind.
    pub kind: EventKind,
    /// Starting address involved, if any.
    pub addr: Option<u64>,
    /// Size involved, if any.
    pub size: Option<u64>,
    /// Machine-readable outcome label.
    pub outcome: &'static str,
}

/// Invariant violation found by [`MemoryManager::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A segment starts at a different address than expected.
    CoverageGap { expected: u64, found: u64 },
    /// A segment with `left > right`.
    InvertedSegment { left: u64, right: u64 },
    /// The address space does not end at `total_size`.
    ShortCoverage { covered: u64, total: u64 },
    /// Two neighboring segments are both free (missed merge).
    AdjacentFreeSegments { boundary: u64 },
    /// Free-list count and free-view count disagree.
    FreeCountMismatch { listed: usize, enqueued: usize },
    /// A free segment's heap back-pointer does not match the heap.
    StaleHeapSlot { left: u64, slot: usize },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoverageGap { expected, found } => {
                write!(f, "segment starts at {found}, expected {expected}")
            }
            Self::InvertedSegment { left, right } => {
                write!(f, "inverted segment [{left}, {right}]")
            }
            Self::ShortCoverage { covered, total } => {
                write!(f, "segments cover up to {covered}, total size is {total}")
            }
            Self::AdjacentFreeSegments { boundary } => {
                write!(f, "unmerged free segments meet at address {boundary}")
            }
            Self::FreeCountMismatch { listed, enqueued } => {
                write!(f, "{listed} free segments in list, {enqueued} in free view")
            }
            Self::StaleHeapSlot { left, slot } => {
                write!(f, "segment at {left} has stale heap slot {slot}")
            }
        }
    }
}

impl std::error::Error for ConsistencyError {}

/// A segment's span as reported by [`MemoryManager::spans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    pub left: u64,
    pub right: u64,
    pub free: bool,
}

type FreeOrder = fn(&FreeEntry, &FreeEntry) -> bool;

/// Best-fit memory manager over a 1-based address space.
pub struct MemoryManager {
    segments: SegmentList,
    free_view: IndexedHeap<FreeEntry, FreeOrder>,
    total_size: u64,
    events: Vec<ManagerEvent>,
    next_sequence: u64,
}

impl MemoryManager {
    /// Creates a manager whose whole space `[1, memory_size]` is one
    /// free segment.
    pub fn new(memory_size: u64) -> Self {
        let mut segments = SegmentList::new();
        let mut free_view: IndexedHeap<FreeEntry, FreeOrder> = IndexedHeap::new(free_order);
        let id = segments.push_back(Segment::new(1, memory_size));
        let entry = FreeEntry::of(id, segments.segment(id));
        free_view.push(entry, &mut segments);
        Self {
            segments,
            free_view,
            total_size: memory_size,
            events: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Allocates `size` addresses (`size >= 1`), best-fit.
    ///
    /// Returns the handle of the allocated segment, or `None` when no
    /// free segment is large enough. The returned handle stays valid
    /// until passed to [`free`](Self::free).
    pub fn allocate(&mut self, size: u64) -> Option<SegmentId> {
        if self.free_view.is_empty() {
            self.record(EventKind::Allocate, None, Some(size), "failed");
            return None;
        }
        let top = *self.free_view.top();
        if top.size() < size {
            self.record(EventKind::Allocate, None, Some(size), "failed");
            return None;
        }
        if top.size() == size {
            // The null notification from pop marks the segment
            // allocated; the handle is reused whole.
            self.free_view.pop(&mut self.segments);
            self.record(EventKind::Allocate, Some(top.left), Some(size), "exact_fit");
            return Some(top.id);
        }

        self.free_view.pop(&mut self.segments);
        let carved = Segment::new(top.left, top.left + size - 1);
        let remainder = self.segments.segment_mut(top.id);
        remainder.left = carved.right + 1;
        let carved_id = self.segments.insert_before(top.id, carved);
        let entry = FreeEntry::of(top.id, self.segments.segment(top.id));
        self.free_view.push(entry, &mut self.segments);
        self.record(EventKind::Allocate, Some(carved.left), Some(size), "split");
        Some(carved_id)
    }

    /// Frees the segment behind `id`, coalescing with free neighbors.
    ///
    /// The freed segment always survives a merge; absorbed neighbor
    /// handles are invalidated. Passing a handle that was already
    /// freed or absorbed is a contract violation.
    pub fn free(&mut self, id: SegmentId) {
        if let Some(prev) = self.segments.prev(id) {
            self.merge_if_free(id, prev, "absorbed_left");
        }
        if let Some(next) = self.segments.next(id) {
            self.merge_if_free(id, next, "absorbed_right");
        }
        let segment = *self.segments.segment(id);
        let entry = FreeEntry::of(id, &segment);
        self.free_view.push(entry, &mut self.segments);
        self.record(
            EventKind::Free,
            Some(segment.left),
            Some(segment.size()),
            "freed",
        );
    }

    /// Borrows the segment behind a live handle.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        self.segments.segment(id)
    }

    /// Size of the managed address space.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of free segments (equals the free-view size).
    pub fn free_segment_count(&self) -> usize {
        self.free_view.len()
    }

    /// All segment spans in address order.
    pub fn spans(&self) -> Vec<SegmentSpan> {
        self.segments
            .iter()
            .map(|(_, s)| SegmentSpan {
                left: s.left,
                right: s.right,
                free: s.is_free(),
            })
            .collect()
    }

    /// Drains the accumulated lifecycle events.
    pub fn take_events(&mut self) -> Vec<ManagerEvent> {
        mem::take(&mut self.events)
    }

    /// Verifies the structural invariants: segments partition
    /// `[1, total_size]` in address order, no two adjacent segments
    /// are both free, and every free segment's heap back-pointer is
    /// exact.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let mut expected = 1;
        let mut previous_free = false;
        let mut listed_free = 0;
        for (id, segment) in self.segments.iter() {
            if segment.left > segment.right {
                return Err(ConsistencyError::InvertedSegment {
                    left: segment.left,
                    right: segment.right,
                });
            }
            if segment.left != expected {
                return Err(ConsistencyError::CoverageGap {
                    expected,
                    found: segment.left,
                });
            }
            if segment.is_free() {
                listed_free += 1;
                if previous_free {
                    return Err(ConsistencyError::AdjacentFreeSegments {
                        boundary: segment.left,
                    });
                }
                let matches = self
                    .free_view
                    .get(segment.heap_slot)
                    .is_some_and(|entry| entry.id == id && entry.left == segment.left);
                if !matches {
                    return Err(ConsistencyError::StaleHeapSlot {
                        left: segment.left,
                        slot: segment.heap_slot,
                    });
                }
            }
            previous_free = segment.is_free();
            expected = segment.right + 1;
        }
        if expected != self.total_size + 1 {
            return Err(ConsistencyError::ShortCoverage {
                covered: expected - 1,
                total: self.total_size,
            });
        }
        if listed_free != self.free_view.len() {
            return Err(ConsistencyError::FreeCountMismatch {
                listed: listed_free,
                enqueued: self.free_view.len(),
            });
        }
        Ok(())
    }

    /// Merges `absorbed` into `survivor` if `absorbed` is free.
    fn merge_if_free(&mut self, survivor: SegmentId, absorbed: SegmentId, outcome: &'static str) {
        let neighbor = *self.segments.segment(absorbed);
        if !neighbor.is_free() {
            return;
        }
        let united = self.segments.segment(survivor).unite(&neighbor);
        let segment = self.segments.segment_mut(survivor);
        segment.left = united.left;
        segment.right = united.right;
        self.free_view.erase(neighbor.heap_slot, &mut self.segments);
        self.segments.remove(absorbed);
        self.record(
            EventKind::Merge,
            Some(united.left),
            Some(united.size()),
            outcome,
        );
    }

    fn record(&mut self, kind: EventKind, addr: Option<u64>, size: Option<u64>, outcome: &'static str) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(ManagerEvent {
            sequence,
            kind,
            addr,
            size,
            outcome,
        });
    }
}
