use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Error;

/// Branch-to-environment table parsed from the `branch-to-env-map` input.
///
/// Entries keep their first-insertion position; a duplicate branch
/// overwrites the stored value in place, so the last occurrence wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BranchMap {
    entries: Vec<(String, String)>,
}

impl BranchMap {
    /// Parse a newline-delimited `branch=environment` table.
    ///
    /// Lines are trimmed and blank lines skipped. A non-blank line without
    /// a `=` separator is rejected. Splitting happens on the first `=`, so
    /// values may themselves contain `=`.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut map = BranchMap::default();
        for line in input.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((branch, environment)) = line.split_once('=') else {
                return Err(Error::MalformedMapping {
                    line: line.to_string(),
                });
            };
            map.insert(branch, environment);
        }
        debug!("Parsed {} branch mapping(s)", map.len());
        Ok(map)
    }

    fn insert(&mut self, branch: &str, environment: &str) {
        match self.entries.iter_mut().find(|(b, _)| b == branch) {
            Some((_, value)) => *value = environment.to_string(),
            None => self
                .entries
                .push((branch.to_string(), environment.to_string())),
        }
    }

    /// The environment mapped for `branch`. An empty value counts as
    /// unmapped, so `main=` never resolves.
    pub fn resolve(&self, branch: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(b, _)| b == branch)
            .map(|(_, environment)| environment.as_str())
            .filter(|environment| !environment.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The table rendered as a JSON object, entries in insertion order.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("string map serializes to JSON")
    }
}

impl Serialize for BranchMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (branch, environment) in &self.entries {
            map.serialize_entry(branch, environment)?;
        }
        map.end()
    }
}

/// Branch name for a triggering ref (`refs/heads/feature-x` → `feature-x`).
///
/// A ref outside `refs/heads/` (tags, pull request merge refs) is used
/// verbatim and will only resolve if mapped literally.
pub fn branch_from_ref(git_ref: &str) -> &str {
    git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref)
}
