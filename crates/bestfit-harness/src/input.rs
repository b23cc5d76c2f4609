//! Text input parsing.
//!
//! The wire format is whitespace-separated integers: the memory size,
//! the query count, then one signed value per query. A positive value
//! requests an allocation of that size; a negative value frees the
//! allocation made by the query at 1-based position `-value` among all
//! queries so far. Anything else is malformed and fatal — the core
//! cannot meaningfully continue with an unclassified request, so
//! classification failures stop at this boundary.

use bestfit_core::{AllocationQuery, FreeQuery, Query};
use thiserror::Error;

/// A fully parsed simulation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// Size of the simulated address space.
    pub memory_size: u64,
    /// Well-typed query sequence.
    pub queries: Vec<Query>,
}

/// Why an input stream could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing memory size")]
    MissingMemorySize,
    #[error("missing query count")]
    MissingQueryCount,
    #[error("expected {expected} queries, input ends after {found}")]
    UnexpectedEnd { expected: usize, found: usize },
    #[error("not an integer: {token:?}")]
    InvalidInteger { token: String },
    #[error("query {index} has value {value}, which is neither an allocation nor a free")]
    InvalidQueryShape { value: i64, index: usize },
    #[error("query {position} frees query {index}, but only {limit} queries precede it")]
    FreeIndexOutOfRange {
        index: usize,
        limit: usize,
        position: usize,
    },
}

/// Parses a complete simulation input.
pub fn parse_simulation(text: &str) -> Result<Simulation, ParseError> {
    let mut tokens = text.split_whitespace();

    let memory_size = tokens
        .next()
        .ok_or(ParseError::MissingMemorySize)
        .and_then(parse_unsigned)?;
    let query_count = tokens
        .next()
        .ok_or(ParseError::MissingQueryCount)
        .and_then(parse_unsigned)? as usize;

    let mut queries = Vec::with_capacity(query_count);
    for position in 1..=query_count {
        let token = tokens.next().ok_or(ParseError::UnexpectedEnd {
            expected: query_count,
            found: position - 1,
        })?;
        let value = parse_signed(token)?;
        let query = classify(value, position)?;
        queries.push(query);
    }

    Ok(Simulation {
        memory_size,
        queries,
    })
}

fn classify(value: i64, position: usize) -> Result<Query, ParseError> {
    if value > 0 {
        return Ok(Query::Allocation(AllocationQuery {
            size: value as u64,
        }));
    }
    if value < 0 {
        let index = (-value) as usize;
        // A free query may only reference a query it has already seen.
        if index >= position {
            return Err(ParseError::FreeIndexOutOfRange {
                index,
                limit: position - 1,
                position,
            });
        }
        return Ok(Query::Free(FreeQuery { query_index: index }));
    }
    Err(ParseError::InvalidQueryShape { value, index: position })
}

fn parse_unsigned(token: &str) -> Result<u64, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidInteger {
        token: token.to_owned(),
    })
}

fn parse_signed(token: &str) -> Result<i64, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidInteger {
        token: token.to_owned(),
    })
}
