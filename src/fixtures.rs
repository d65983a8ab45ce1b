//! Fixtures
//!
//! YAML-described allocation scenarios for demos and integration tests.
//!
//! ```yaml
//! discounts: [5, 12, 13, 60]
//! items: [20, 40, 30]
//! ceilings:
//!   - { item: 0, discount: 1, max: 0 }
//!   - { item: 1, discount: 1, max: 0 }
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{allocate::AllocationRequest, ceilings::CeilingMap};

/// Errors raised while loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The fixture file is not valid YAML for the expected schema.
    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),
}

/// One ceiling entry in a fixture; a `max` of 0 excludes the cell.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CeilingFixture {
    /// Item row index.
    pub item: usize,

    /// Discount column index.
    pub discount: usize,

    /// Maximum amount for the cell; 0 means the item never carries the
    /// discount.
    pub max: i64,
}

/// A complete allocation scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationFixture {
    /// Budget per discount.
    pub discounts: Vec<i64>,

    /// Target per item.
    pub items: Vec<i64>,

    /// Optional per-cell ceilings.
    #[serde(default)]
    pub ceilings: Vec<CeilingFixture>,
}

impl AllocationFixture {
    /// Parses a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the YAML does not match the schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Builds an [`AllocationRequest`] from the fixture.
    #[must_use]
    pub fn into_request(self) -> AllocationRequest {
        let mut ceilings = CeilingMap::new();
        for entry in &self.ceilings {
            ceilings.cap(entry.item, entry.discount, entry.max);
        }

        AllocationRequest::new(self.discounts, self.items).with_ceilings(ceilings)
    }
}

/// Loads an allocation fixture from a YAML file.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the file cannot be read or parsed.
pub fn load_allocation_fixture(path: impl AsRef<Path>) -> Result<AllocationFixture, FixtureError> {
    let contents = fs::read_to_string(path)?;
    AllocationFixture::from_yaml(&contents)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_yaml_with_ceilings() -> TestResult {
        let yaml = "discounts: [5, 12, 13, 60]\nitems: [20, 40, 30]\nceilings:\n  - { item: 0, discount: 1, max: 0 }\n";

        let fixture = AllocationFixture::from_yaml(yaml)?;

        assert_eq!(fixture.discounts, vec![5, 12, 13, 60]);
        assert_eq!(fixture.items, vec![20, 40, 30]);
        assert_eq!(fixture.ceilings.len(), 1);
        assert_eq!(fixture.ceilings[0].max, 0);

        Ok(())
    }

    #[test]
    fn ceilings_are_optional() -> TestResult {
        let fixture = AllocationFixture::from_yaml("discounts: [20]\nitems: [5, 7, 8]\n")?;

        assert!(fixture.ceilings.is_empty());

        Ok(())
    }

    #[test]
    fn fixture_requests_are_solvable() -> TestResult {
        let yaml = "discounts: [5, 12, 13, 60]\nitems: [20, 40, 30]\nceilings:\n  - { item: 0, discount: 1, max: 0 }\n  - { item: 1, discount: 1, max: 0 }\n";

        let table = AllocationFixture::from_yaml(yaml)?.into_request().solve()?;

        assert!(table.is_balanced());
        assert!(table.respects_ceilings());

        Ok(())
    }

    #[test]
    fn loads_a_fixture_from_a_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "discounts: [20]")?;
        writeln!(file, "items: [5, 7, 8]")?;

        let fixture = load_allocation_fixture(file.path())?;

        assert_eq!(fixture.items, vec![5, 7, 8]);

        Ok(())
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = AllocationFixture::from_yaml("discounts: 12\nitems: nope\n");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));
    }
}
