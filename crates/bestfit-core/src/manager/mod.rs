//! Best-fit memory manager: segment storage and allocation policy.

pub mod allocator;
pub mod segment;

pub use allocator::{
    ConsistencyError, EventKind, ManagerEvent, MemoryManager, SegmentSpan,
};
pub use segment::{Segment, SegmentId, SegmentList};
