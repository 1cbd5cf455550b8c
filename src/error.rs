use std::fmt::{self, Debug, Display};

use crate::entity::EntityId;

/// Provides `TickworkError` and maps other errors to
/// convert to a `TickworkError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum TickworkError {
    /// The entity has no feature of the requested capability type.
    MissingFeature(&'static str),
    /// A feature of this capability type is already attached. Features are
    /// write-once for an entity's lifetime.
    DuplicateFeature(&'static str),
    /// The entity has been destroyed; capability queries are no longer valid.
    EntityDestroyed(EntityId),
    /// The service locator has no service of the requested type.
    MissingService(&'static str),
    /// A required configuration parameter is missing or malformed.
    Config(String),
    TickworkError(String),
}

impl From<String> for TickworkError {
    fn from(error: String) -> Self {
        TickworkError::TickworkError(error)
    }
}

impl From<&str> for TickworkError {
    fn from(error: &str) -> Self {
        TickworkError::TickworkError(error.to_string())
    }
}

impl std::error::Error for TickworkError {}

impl Display for TickworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_variant() {
        let error = TickworkError::MissingFeature("TransformableModel");
        assert!(error.to_string().contains("TransformableModel"));
    }

    #[test]
    fn from_string() {
        let error: TickworkError = "bad value".into();
        assert!(matches!(error, TickworkError::TickworkError(message) if message == "bad value"));
    }
}
