use std::fmt::{self, Display, Formatter};

use crate::error::{ModelError, Result};

/// Opaque usage locator, unique within a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Locator(String);

impl Locator {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a locator, rejecting blank values.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyLocator);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
