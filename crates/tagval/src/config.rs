//! Validator configuration.

use serde::{Deserialize, Serialize};

/// Tag key read by default.
pub const DEFAULT_TAG_KEY: &str = "valid";

/// Settings fixed when a [`Validator`](crate::Validator) is built.
///
/// Missing keys fall back to their defaults when deserializing, so a partial
/// document such as `{ "tag_key": "check" }` loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Tag key whose raw tags the validator reads from field descriptors.
    pub tag_key: String,

    /// Leave field values out of error messages.
    pub suppress_field_value: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tag_key: DEFAULT_TAG_KEY.to_owned(),
            suppress_field_value: false,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_suppress_field_value(mut self, suppress: bool) -> Self {
        self.suppress_field_value = suppress;
        self
    }
}
