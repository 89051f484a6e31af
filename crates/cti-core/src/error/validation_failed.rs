use super::Error;

/// Error when an instance fails validation and is not saved.
///
/// The per-attribute messages stay on the instance's error collection; this
/// error only carries a summary.
#[derive(Debug)]
pub(super) struct ValidationFailedError {
    model: Box<str>,
    count: usize,
}

impl std::error::Error for ValidationFailedError {}

impl core::fmt::Display for ValidationFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let noun = if self.count == 1 { "error" } else { "errors" };
        write!(
            f,
            "validation failed for `{}` ({} {})",
            self.model, self.count, noun
        )
    }
}

impl Error {
    /// Creates a validation failed error.
    pub fn validation_failed(model: impl Into<String>, count: usize) -> Error {
        Error::from(super::ErrorKind::ValidationFailed(ValidationFailedError {
            model: model.into().into(),
            count,
        }))
    }

    /// Returns `true` if this error is a validation failure.
    pub fn is_validation_failed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ValidationFailed(_)))
    }
}
