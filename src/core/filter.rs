use regex::Regex;

use crate::error::{JavabindError, Result};

/// Decides which discovered classes get fully expanded.
///
/// Patterns are regular expressions over fully-qualified class names,
/// evaluated independently as a logical OR. There is no precedence and
/// no negation; a class is in scope iff at least one pattern matches.
pub struct InclusionFilter {
    patterns: Vec<Regex>,
}

impl InclusionFilter {
    /// Compile the configured patterns. A malformed pattern is fatal
    /// here, before any reflection starts.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|e| JavabindError::Filter {
                pattern: pattern.clone(),
                source: e,
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// Whether a class with this fully-qualified name should be
    /// expanded. Callers unwrap arrays and strip primitives before
    /// asking; only plain class names reach the filter.
    pub fn should_expand(&self, class_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(class_name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
