//! Response formatting and the conformance report.

use crate::runner::VerificationResult;
use bestfit_core::AllocationResponse;

/// Formats responses as the original program prints them: one line per
/// allocation query, the granted address or `-1`.
pub fn format_responses(responses: &[AllocationResponse]) -> String {
    let mut out = String::new();
    for response in responses {
        if response.success {
            out.push_str(&response.position.to_string());
        } else {
            out.push_str("-1");
        }
        out.push('\n');
    }
    out
}

/// Markdown summary of a verification run.
pub struct ConformanceReport {
    /// Campaign name shown in the header.
    pub campaign: String,
    /// Per-case results.
    pub results: Vec<VerificationResult>,
}

impl ConformanceReport {
    /// Number of passing cases.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Whether every case passed.
    pub fn all_passed(&self) -> bool {
        self.passed() == self.results.len()
    }

    /// Renders the report as markdown.
    pub fn to_markdown(&self) -> String {
        let total = self.results.len();
        let passed = self.passed();
        let mut out = String::new();
        out.push_str(&format!("# Conformance report: {}\n\n", self.campaign));
        out.push_str(&format!("- Cases: {total}\n- Passed: {passed}\n"));
        if total > 0 {
            out.push_str(&format!(
                "- Pass rate: {:.1}%\n",
                passed as f64 * 100.0 / total as f64
            ));
        }
        let failing: Vec<&VerificationResult> =
            self.results.iter().filter(|r| !r.passed).collect();
        if !failing.is_empty() {
            out.push_str("\n## Failing cases\n\n");
            for result in failing {
                out.push_str(&format!("### {}\n\n", result.case_name));
                if let Some(diff) = &result.diff {
                    out.push_str("```\n");
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n\n");
                }
            }
        }
        out
    }
}
