//! Run configuration parsing.
//!
//! The orchestration service stores per-partition run configuration as a
//! YAML-formatted document. A launch parses that document into a structured
//! mapping before submitting it; an empty or absent document means an empty
//! mapping, not an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Tag key carrying the derived step selection on a launched run.
pub const STEP_SELECTION_TAG: &str = "strata/step_selection";

/// A parsed run configuration mapping.
///
/// Values are held as JSON values since that is how they cross the wire to
/// the mutation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunConfig(Map<String, Value>);

impl RunConfig {
    /// Creates an empty configuration mapping.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a YAML-formatted configuration document.
    ///
    /// Empty or whitespace-only input (and an explicit YAML `null` document)
    /// parse as the empty mapping.
    ///
    /// # Errors
    /// Returns an error if the document is malformed YAML or parses to a
    /// non-mapping value.
    pub fn parse_yaml(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::empty());
        }

        let value: Value = serde_yaml::from_str(input).map_err(|e| Error::InvalidConfig {
            message: format!("malformed YAML: {e}"),
        })?;

        match value {
            Value::Null => Ok(Self::empty()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidConfig {
                message: format!("expected a mapping at the document root, found {other}"),
            }),
        }
    }

    /// Returns true if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a top-level configuration value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A key/value tag attached to a launched run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Builds the derived step-selection tag for a set of step keys.
    #[must_use]
    pub fn step_selection(step_keys: &[String]) -> Self {
        Self::new(STEP_SELECTION_TAG, step_keys.join(","))
    }
}
