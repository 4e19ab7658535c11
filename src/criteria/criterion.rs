//! Criterion and Criteria types and the matching engine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::pattern::{PatternError, StdoutPattern};

/// Exit codes and stdout patterns that mute a run when both qualify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Criterion {
    /// Exit codes that qualify; empty accepts any exit code
    #[serde(default)]
    pub exit_codes: Vec<i32>,
    /// Patterns of which at least one must match stdout; empty accepts any stdout
    #[serde(default)]
    pub stdout_patterns: Vec<StdoutPattern>,
}

impl Criterion {
    /// Create a criterion from exit codes and pattern source strings
    pub fn new(exit_codes: &[i32], patterns: &[&str]) -> Result<Self, PatternError> {
        let stdout_patterns = patterns
            .iter()
            .map(|p| StdoutPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(exit_codes.to_vec(), stdout_patterns))
    }

    /// Create a criterion from already compiled patterns
    pub fn from_parts(exit_codes: Vec<i32>, stdout_patterns: Vec<StdoutPattern>) -> Self {
        Self {
            exit_codes,
            stdout_patterns,
        }
    }

    /// A criterion is empty when it has neither exit codes nor patterns
    pub fn is_empty(&self) -> bool {
        self.exit_codes.is_empty() && self.stdout_patterns.is_empty()
    }

    /// Check if a run with the given exit code and stdout satisfies this criterion
    ///
    /// An empty criterion never matches.
    pub fn matches(&self, exit_code: i32, stdout: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        self.accepts_exit_code(exit_code) && self.accepts_stdout(stdout)
    }

    fn accepts_exit_code(&self, exit_code: i32) -> bool {
        self.exit_codes.is_empty() || self.exit_codes.contains(&exit_code)
    }

    fn accepts_stdout(&self, stdout: &str) -> bool {
        self.stdout_patterns.is_empty() || self.stdout_patterns.iter().any(|p| p.is_match(stdout))
    }
}

/// Exit codes and pattern texts compare as sets: order and repeated entries do not matter
impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool {
        let codes: HashSet<i32> = self.exit_codes.iter().copied().collect();
        let other_codes: HashSet<i32> = other.exit_codes.iter().copied().collect();
        if codes != other_codes {
            return false;
        }

        let patterns: HashSet<&str> = self.stdout_patterns.iter().map(|p| p.as_str()).collect();
        let other_patterns: HashSet<&str> =
            other.stdout_patterns.iter().map(|p| p.as_str()).collect();
        patterns == other_patterns
    }
}

impl Eq for Criterion {}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.exit_codes.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "<Criterion codes=\"{}\" patterns_count=\"{}\">",
            codes.join(","),
            self.stdout_patterns.len()
        )
    }
}

/// Ordered list of criteria; a run is muted if it matches any of them
///
/// Order does not affect matching but is preserved for debugging and
/// serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(Vec<Criterion>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion, returning self for chaining
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.0.push(criterion);
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.0.push(criterion);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if an equal criterion is present
    pub fn contains(&self, criterion: &Criterion) -> bool {
        self.0.iter().any(|c| c == criterion)
    }

    /// Check if a run matches any non-empty criterion
    ///
    /// Short-circuits on the first match. Empty criteria are skipped.
    pub fn matches_run(&self, exit_code: i32, stdout: &str) -> bool {
        self.0
            .iter()
            .filter(|c| !c.is_empty())
            .any(|c| c.matches(exit_code, stdout))
    }
}

/// Equal cardinality plus containment in both directions
impl PartialEq for Criteria {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|c| other.contains(c))
            && other.iter().all(|c| self.contains(c))
    }
}

impl Eq for Criteria {}

impl From<Vec<Criterion>> for Criteria {
    fn from(items: Vec<Criterion>) -> Self {
        Self(items)
    }
}

impl FromIterator<Criterion> for Criteria {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
