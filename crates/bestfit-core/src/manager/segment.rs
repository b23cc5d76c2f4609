//! Segments and the arena-backed segment list.
//!
//! Segments partition the simulated address space at all times. They
//! live in a doubly-linked list whose nodes are slots in a `Vec`, so a
//! handle to a segment is a stable slot index that survives unrelated
//! insertions and removals (the role `std::list` iterators play in
//! pointer-based designs). Vacated slots are recycled through a free
//! stack; a slot is only reused after its previous occupant has been
//! unlinked from every external structure.

use crate::heap::NULL_INDEX;

/// Stable handle to a segment in a [`SegmentList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(usize);

impl SegmentId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A contiguous address range `[left, right]`, inclusive and 1-based.
///
/// There is no explicit free/allocated flag: a segment is free exactly
/// when `heap_slot != NULL_INDEX`, i.e. when it currently sits in the
/// free-priority view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First address covered by the segment.
    pub left: u64,
    /// Last address covered by the segment.
    pub right: u64,
    /// Current index in the free-view heap, or [`NULL_INDEX`].
    pub heap_slot: usize,
}

impl Segment {
    /// Creates a segment not yet present in the free view.
    pub fn new(left: u64, right: u64) -> Self {
        Self {
            left,
            right,
            heap_slot: NULL_INDEX,
        }
    }

    /// Number of addresses covered. Zero for the degenerate
    /// `right == left - 1` span a zero-size space produces.
    pub fn size(&self) -> u64 {
        self.right + 1 - self.left
    }

    /// Whether the segment currently sits in the free view.
    pub fn is_free(&self) -> bool {
        self.heap_slot != NULL_INDEX
    }

    /// The covering range of two segments (min left, max right).
    pub fn unite(&self, other: &Segment) -> Segment {
        Segment::new(self.left.min(other.left), self.right.max(other.right))
    }
}

#[derive(Debug)]
struct Node {
    segment: Segment,
    prev: Option<SegmentId>,
    next: Option<SegmentId>,
}

/// Doubly-linked list of segments in address order, arena-backed.
#[derive(Debug, Default)]
pub struct SegmentList {
    slots: Vec<Option<Node>>,
    head: Option<SegmentId>,
    tail: Option<SegmentId>,
    free_slots: Vec<usize>,
    len: usize,
}

impl SegmentList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the first (lowest-address) segment.
    pub fn head(&self) -> Option<SegmentId> {
        self.head
    }

    /// Appends a segment at the end of the list.
    pub fn push_back(&mut self, segment: Segment) -> SegmentId {
        let id = self.claim_slot(segment, self.tail, None);
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Inserts a segment immediately before `before`, returning its
    /// handle.
    pub fn insert_before(&mut self, before: SegmentId, segment: Segment) -> SegmentId {
        let prev = self.node(before).prev;
        let id = self.claim_slot(segment, prev, Some(before));
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.head = Some(id),
        }
        self.node_mut(before).prev = Some(id);
        id
    }

    /// Unlinks `id` and recycles its slot.
    ///
    /// Handles to other segments stay valid; `id` itself must not be
    /// used afterwards.
    pub fn remove(&mut self, id: SegmentId) {
        let node = self.slots[id.index()]
            .take()
            .expect("stale segment handle");
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free_slots.push(id.index());
        self.len -= 1;
    }

    /// Handle of the segment before `id`, if any.
    pub fn prev(&self, id: SegmentId) -> Option<SegmentId> {
        self.node(id).prev
    }

    /// Handle of the segment after `id`, if any.
    pub fn next(&self, id: SegmentId) -> Option<SegmentId> {
        self.node(id).next
    }

    /// Borrows the segment behind `id`.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.node(id).segment
    }

    /// Mutably borrows the segment behind `id`.
    pub fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.node_mut(id).segment
    }

    /// Iterates over segments in address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn claim_slot(
        &mut self,
        segment: Segment,
        prev: Option<SegmentId>,
        next: Option<SegmentId>,
    ) -> SegmentId {
        let node = Node {
            segment,
            prev,
            next,
        };
        self.len += 1;
        match self.free_slots.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                SegmentId(index)
            }
            None => {
                self.slots.push(Some(node));
                SegmentId(self.slots.len() - 1)
            }
        }
    }

    fn node(&self, id: SegmentId) -> &Node {
        self.slots[id.index()]
            .as_ref()
            .expect("stale segment handle")
    }

    fn node_mut(&mut self, id: SegmentId) -> &mut Node {
        self.slots[id.index()]
            .as_mut()
            .expect("stale segment handle")
    }
}

/// Address-order iterator over a [`SegmentList`].
pub struct Iter<'a> {
    list: &'a SegmentList,
    cursor: Option<SegmentId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SegmentId, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.list.next(id);
        Some((id, self.list.segment(id)))
    }
}
