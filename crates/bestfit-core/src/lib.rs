//! # bestfit-core
//!
//! Simulation core for a best-fit dynamic memory allocator over a
//! fixed linear address space. The crate is pure, safe Rust with no
//! dependencies: an indexed binary heap, an arena-backed segment
//! list, the best-fit manager itself, and the sequential driver that
//! replays a query stream.

#![deny(unsafe_code)]

pub mod heap;
pub mod manager;
pub mod query;
pub mod sim;

pub use heap::{IndexObserver, IndexedHeap, NULL_INDEX};
pub use manager::{
    ConsistencyError, EventKind, ManagerEvent, MemoryManager, Segment, SegmentId, SegmentSpan,
};
pub use query::{AllocationQuery, AllocationResponse, FreeQuery, Query};
pub use sim::{run_memory_manager, run_memory_manager_traced};
