use super::Error;

/// Error when a model name, association id or discriminator does not resolve
/// to a registered model.
#[derive(Debug)]
pub(super) struct UnknownModelError {
    name: Box<str>,
}

impl std::error::Error for UnknownModelError {}

impl core::fmt::Display for UnknownModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown model: `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown model error.
    pub fn unknown_model(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownModel(UnknownModelError {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown model error.
    pub fn is_unknown_model(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownModel(_)))
    }
}
