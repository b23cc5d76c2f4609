//! Query and response model for the simulation.
//!
//! Queries are a closed sum type, so a request is either a well-formed
//! allocation or a well-formed free by construction; there is no
//! "unknown query kind" to check for at run time. Classifying raw
//! input into this type is the parser's job, and that is where a
//! malformed record becomes a fatal error.

/// Request for `size` contiguous addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationQuery {
    /// Requested size, at least 1.
    pub size: u64,
}

/// Request to free the allocation made by an earlier query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeQuery {
    /// 1-based position of the referenced query among *all* queries
    /// seen so far, free queries included.
    pub query_index: usize,
}

/// A single simulation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Allocation(AllocationQuery),
    Free(FreeQuery),
}

/// Outcome of one allocation query.
///
/// Build these through [`successful`](Self::successful) and
/// [`failed`](Self::failed); direct field construction is reserved for
/// test fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationResponse {
    /// Whether an address was granted.
    pub success: bool,
    /// Granted 1-based starting address; 0 on failure.
    pub position: u64,
}

impl AllocationResponse {
    /// Response granting the given starting address.
    pub fn successful(position: u64) -> Self {
        Self {
            success: true,
            position,
        }
    }

    /// Response for an allocation that could not be satisfied.
    pub fn failed() -> Self {
        Self {
            success: false,
            position: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_build_canonical_responses() {
        assert_eq!(
            AllocationResponse::successful(7),
            AllocationResponse {
                success: true,
                position: 7
            }
        );
        assert_eq!(
            AllocationResponse::failed(),
            AllocationResponse {
                success: false,
                position: 0
            }
        );
    }
}
