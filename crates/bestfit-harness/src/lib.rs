//! Tooling around the best-fit simulator core.
//!
//! This crate provides:
//! - Input parsing: the original text query format, strictly validated
//! - Output formatting: one line per allocation response
//! - Fixtures: JSON reference cases for conformance runs
//! - Runner: execute fixture sets and diff actual against expected
//! - Trace: JSONL emission of the manager's lifecycle events
//! - Report: markdown conformance summary

#![forbid(unsafe_code)]

pub mod diff;
pub mod fixtures;
pub mod input;
pub mod report;
pub mod runner;
pub mod trace;

pub use fixtures::{FixtureCase, FixtureSet};
pub use input::{ParseError, Simulation, parse_simulation};
pub use report::{ConformanceReport, format_responses};
pub use runner::{TestRunner, VerificationResult};
