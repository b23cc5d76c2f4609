//! Sequential simulation driver.
//!
//! Replays a query sequence against one [`MemoryManager`] and collects
//! one response per allocation query. The driver owns the handle
//! lifecycle: every query gets a handle slot indexed by its 1-based
//! position (free queries and failed allocations hold nothing), and
//! freeing `take`s the slot so a second free of the same index, or a
//! free of a failed allocation, is a no-op.

use crate::manager::{ManagerEvent, MemoryManager};
use crate::query::{AllocationResponse, Query};

/// Runs `queries` against a fresh manager of `memory_size` addresses.
///
/// Responses are returned in allocation-query order. Free queries
/// whose `query_index` exceeds the number of queries seen so far are a
/// contract violation (the parser rejects them before they get here)
/// and panic.
pub fn run_memory_manager(memory_size: u64, queries: &[Query]) -> Vec<AllocationResponse> {
    run_memory_manager_traced(memory_size, queries).0
}

/// Like [`run_memory_manager`], additionally returning the manager's
/// lifecycle events for trace emission.
pub fn run_memory_manager_traced(
    memory_size: u64,
    queries: &[Query],
) -> (Vec<AllocationResponse>, Vec<ManagerEvent>) {
    let mut manager = MemoryManager::new(memory_size);
    let mut responses = Vec::new();
    let mut handles = Vec::with_capacity(queries.len());

    for query in queries {
        match query {
            Query::Allocation(allocation) => {
                let handle = manager.allocate(allocation.size);
                match handle {
                    Some(id) => responses.push(AllocationResponse::successful(
                        manager.segment(id).left,
                    )),
                    None => responses.push(AllocationResponse::failed()),
                }
                handles.push(handle);
            }
            Query::Free(free) => {
                if let Some(id) = handles[free.query_index - 1].take() {
                    manager.free(id);
                }
                handles.push(None);
            }
        }
    }

    let events = manager.take_events();
    (responses, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{AllocationQuery, FreeQuery};

    fn queries(raw: &[i64]) -> Vec<Query> {
        raw.iter()
            .map(|&value| {
                if value > 0 {
                    Query::Allocation(AllocationQuery { size: value as u64 })
                } else {
                    Query::Free(FreeQuery {
                        query_index: (-value) as usize,
                    })
                }
            })
            .collect()
    }

    fn positions(responses: &[AllocationResponse]) -> Vec<i64> {
        responses
            .iter()
            .map(|r| if r.success { r.position as i64 } else { -1 })
            .collect()
    }

    #[test]
    fn freed_space_is_reused_from_the_left() {
        // Freeing [1,3] coalesces with the untouched tail [4,10], so
        // the size-5 request is carved from [1,10] at address 1.
        let responses = run_memory_manager(10, &queries(&[3, -1, 5]));
        assert_eq!(positions(&responses), vec![1, 1]);
    }

    #[test]
    fn second_allocation_fails_without_space() {
        let responses = run_memory_manager(5, &queries(&[3, 3]));
        assert_eq!(positions(&responses), vec![1, -1]);
    }

    #[test]
    fn merged_frees_satisfy_a_large_request() {
        let responses = run_memory_manager(10, &queries(&[4, 4, -1, -2, 8]));
        assert_eq!(positions(&responses), vec![1, 5, 1]);
    }

    #[test]
    fn freeing_a_failed_allocation_changes_nothing() {
        let with_noop_free = run_memory_manager(5, &queries(&[4, 4, -2, 3, 1]));
        let without = run_memory_manager(5, &queries(&[4, 4, 3, 1]));
        assert_eq!(positions(&with_noop_free), vec![1, -1, -1, 5]);
        assert_eq!(positions(&without), positions(&with_noop_free));
    }

    #[test]
    fn free_index_counts_every_query() {
        // Query 2 is itself a free query; query 4 therefore has index
        // 4, not 3. Raw query position is what the index refers to.
        let responses = run_memory_manager(10, &queries(&[2, -1, 3, 4, -4]));
        assert_eq!(positions(&responses), vec![1, 1, 4]);
        // After freeing query 4's allocation ([4,7]), a size-7
        // request only fits if [4,10] coalesced.
        let responses = run_memory_manager(10, &queries(&[2, -1, 3, 4, -4, 7]));
        assert_eq!(positions(&responses), vec![1, 1, 4, 4]);
    }

    #[test]
    fn double_free_is_a_no_op() {
        let responses = run_memory_manager(10, &queries(&[4, -1, -1, 4]));
        assert_eq!(positions(&responses), vec![1, 1]);
    }

    #[test]
    fn empty_query_sequence_yields_no_responses() {
        assert!(run_memory_manager(10, &[]).is_empty());
    }
}
