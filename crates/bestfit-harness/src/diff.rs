//! Line diff rendering for verification mismatches.

/// Renders a minimal expected/actual line diff.
///
/// Matching lines print with a two-space margin, divergent lines as
/// `- expected` / `+ actual`.
pub fn render_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let mut out = String::new();
    let max = expected_lines.len().max(actual_lines.len());
    for index in 0..max {
        match (expected_lines.get(index), actual_lines.get(index)) {
            (Some(want), Some(got)) if want == got => {
                out.push_str(&format!("  {want}\n"));
            }
            (want, got) => {
                if let Some(want) = want {
                    out.push_str(&format!("- {want}\n"));
                }
                if let Some(got) = got {
                    out.push_str(&format!("+ {got}\n"));
                }
            }
        }
    }
    out
}
