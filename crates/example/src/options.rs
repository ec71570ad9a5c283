//! Options controlling one example generation run.

use crate::{ExampleError, Result};
use otm_model::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Which facet of an object represents it when a choice exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailLevel {
    /// Least detailed facet that still declares content.
    Minimum,
    /// Most detailed facet that declares content.
    #[default]
    Maximum,
}

/// Options for a generation run. Immutable while a run is in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub detail_level: DetailLevel,
    /// Example context whose literals win over any other context.
    pub preferred_context: Option<String>,
    pub max_repeat: i32,
    pub max_recursion_depth: i32,
    /// Facet to use for a given owning object, bypassing detail selection.
    pub preferred_facets: HashMap<EntityId, EntityId>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            detail_level: DetailLevel::Maximum,
            preferred_context: None,
            max_repeat: 3,
            max_recursion_depth: 2,
            preferred_facets: HashMap::new(),
        }
    }
}

impl GenerationOptions {
    pub fn with_detail_level(mut self, detail_level: DetailLevel) -> Self {
        self.detail_level = detail_level;
        self
    }

    pub fn with_preferred_context(mut self, context: impl Into<String>) -> Self {
        self.preferred_context = Some(context.into());
        self
    }

    pub fn with_max_repeat(mut self, max_repeat: i32) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: i32) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn with_preferred_facet(mut self, owner: EntityId, facet: EntityId) -> Self {
        self.preferred_facets.insert(owner, facet);
        self
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.check()?;
        Ok(options)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn check(&self) -> Result<()> {
        if self.max_repeat < 1 {
            return Err(ExampleError::config(format!(
                "maxRepeat must be positive, got {}",
                self.max_repeat
            )));
        }
        if self.max_recursion_depth < 1 {
            return Err(ExampleError::config(format!(
                "maxRecursionDepth must be positive, got {}",
                self.max_recursion_depth
            )));
        }
        Ok(())
    }

    /// Number of times an entity may appear on the traversal stack at once.
    pub fn recursion_limit(&self) -> usize {
        self.max_recursion_depth.max(1) as usize
    }

    /// Number of occurrences to emit for a member with the given declared
    /// repeat count. Negative counts are unbounded and capped by `max_repeat`.
    pub fn repeat_count(&self, declared: i32) -> usize {
        let count = if declared >= 0 {
            self.max_repeat.min(declared).max(1)
        } else {
            self.max_repeat.max(1)
        };
        count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repeat_count_bounds() {
        let options = GenerationOptions::default();
        assert_eq!(options.repeat_count(-1), 3);
        assert_eq!(options.repeat_count(5), 3);
        assert_eq!(options.repeat_count(0), 1);
        assert_eq!(options.repeat_count(1), 1);

        let generous = GenerationOptions::default().with_max_repeat(10);
        assert_eq!(generous.repeat_count(2), 2);
        assert_eq!(generous.repeat_count(-1), 10);
    }

    #[test]
    fn test_recursion_limit_is_at_least_one() {
        let mut options = GenerationOptions::default();
        assert_eq!(options.recursion_limit(), 2);
        options.max_recursion_depth = 0;
        assert_eq!(options.recursion_limit(), 1);
    }

    #[test]
    fn test_options_from_json_defaults() {
        let options =
            GenerationOptions::from_json_str(r#"{"detailLevel": "MINIMUM", "preferredContext": "travel"}"#)
                .unwrap();
        assert_eq!(options.detail_level, DetailLevel::Minimum);
        assert_eq!(options.preferred_context.as_deref(), Some("travel"));
        assert_eq!(options.max_repeat, 3);
        assert_eq!(options.max_recursion_depth, 2);
    }

    #[test]
    fn test_options_reject_non_positive_limits() {
        let err = GenerationOptions::from_json_str(r#"{"maxRepeat": 0}"#).unwrap_err();
        assert!(matches!(err, ExampleError::Config(msg) if msg.contains("maxRepeat")));
    }
}
