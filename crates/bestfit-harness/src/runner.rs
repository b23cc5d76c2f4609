//! Fixture execution engine.

use crate::diff;
use crate::fixtures::FixtureSet;
use crate::input::{ParseError, parse_simulation};
use crate::report::format_responses;
use bestfit_core::run_memory_manager;

/// Outcome of one fixture case.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Case identifier.
    pub case_name: String,
    /// Whether actual output matched the expectation.
    pub passed: bool,
    /// Expected formatted output.
    pub expected: String,
    /// Actual formatted output (or an error marker).
    pub actual: String,
    /// Rendered diff when the case failed.
    pub diff: Option<String>,
}

/// Runs fixture sets and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| {
                let actual = match execute_raw_queries(case.memory_size, &case.queries) {
                    Ok(output) => output,
                    Err(err) => format!("parse error: {err}\n"),
                };
                let passed = actual == case.expected_output;
                let diff = (!passed)
                    .then(|| diff::render_diff(&case.expected_output, &actual));
                VerificationResult {
                    case_name: case.name.clone(),
                    passed,
                    expected: case.expected_output.clone(),
                    actual,
                    diff,
                }
            })
            .collect()
    }
}

/// Runs raw query values through the same path as text input, so
/// fixture cases get the same shape validation.
fn execute_raw_queries(memory_size: u64, raw_queries: &[i64]) -> Result<String, ParseError> {
    let mut text = format!("{memory_size} {}", raw_queries.len());
    for value in raw_queries {
        text.push(' ');
        text.push_str(&value.to_string());
    }
    let simulation = parse_simulation(&text)?;
    let responses = run_memory_manager(simulation.memory_size, &simulation.queries);
    Ok(format_responses(&responses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_verifies_matching_cases() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"reuse",
                "cases":[
                    {"name":"reuse_after_free","memory_size":10,"queries":[3,-1,5],"expected_output":"1\n1\n"},
                    {"name":"exhaustion","memory_size":5,"queries":[3,3],"expected_output":"1\n-1\n"}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn runner_reports_a_diff_on_mismatch() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"reuse",
                "cases":[
                    {"name":"wrong_expectation","memory_size":10,"queries":[3],"expected_output":"2\n"}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "1\n");
        assert_eq!(results[0].diff.as_deref(), Some("- 2\n+ 1\n"));
    }

    #[test]
    fn malformed_fixture_queries_fail_with_error_marker() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"malformed",
                "cases":[
                    {"name":"zero_query","memory_size":10,"queries":[3,0],"expected_output":"1\n"}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert!(!results[0].passed);
        assert!(results[0].actual.starts_with("parse error:"));
    }
}
