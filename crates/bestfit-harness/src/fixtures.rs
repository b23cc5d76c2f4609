//! Fixture loading and management.

use serde::{Deserialize, Serialize};

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Size of the simulated address space.
    pub memory_size: u64,
    /// Raw query values as they would appear in the text input.
    pub queries: Vec<i64>,
    /// Expected formatted output (one line per allocation query).
    pub expected_output: String,
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Scenario family name.
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let set = FixtureSet {
            version: "v1".to_owned(),
            family: "reuse".to_owned(),
            cases: vec![FixtureCase {
                name: "reuse_after_free".to_owned(),
                memory_size: 10,
                queries: vec![3, -1, 5],
                expected_output: "1\n1\n".to_owned(),
            }],
        };
        let json = set.to_json().unwrap();
        let back = FixtureSet::from_json(&json).unwrap();
        assert_eq!(back.cases.len(), 1);
        assert_eq!(back.cases[0].queries, vec![3, -1, 5]);
        assert_eq!(back.cases[0].expected_output, "1\n1\n");
    }
}
