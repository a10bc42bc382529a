//! Error taxonomy for the rendering pipeline.

use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the renderer.
///
/// Transport failures while fetching remote resources never appear here
/// directly: the resolver logs them and reports [`Error::ResourceNotFound`].
#[derive(Debug, Error)]
pub enum Error {
    /// An option violates its documented domain or bound.
    #[error("invalid option `{field}`: {constraint}")]
    Validation { field: String, constraint: String },

    /// A font or icon reference could not be resolved.
    #[error("can't find resource `{reference}`")]
    ResourceNotFound { reference: String },

    /// A resource was fetched but its content is not a usable font or image.
    #[error("resource `{reference}` is not usable: {reason}")]
    InvalidResource { reference: String, reason: String },

    /// The syntax highlighter failed.
    #[error("highlighting failed: {0}")]
    Highlight(String),

    /// The final image could not be serialized.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub(crate) fn not_found(reference: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            reference: reference.into(),
        }
    }

    /// Returns true if the error was caused by the request rather than the
    /// renderer itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::ResourceNotFound { .. } | Self::InvalidResource { .. }
        )
    }

    /// Returns the offending option name for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field_and_constraint() {
        let err = Error::validation("tab_name", "length must be in [1, 30], got 31");
        assert_eq!(
            err.to_string(),
            "invalid option `tab_name`: length must be in [1, 30], got 31"
        );
        assert_eq!(err.field(), Some("tab_name"));
        assert!(err.is_client_error());
    }

    #[test]
    fn highlight_errors_are_server_side() {
        let err = Error::Highlight("unknown language `cobol-2099`".into());
        assert!(!err.is_client_error());
        assert_eq!(err.field(), None);
    }
}
