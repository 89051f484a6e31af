use super::Error;

/// Error when an attribute name is neither an own column nor inherited.
#[derive(Debug)]
pub(super) struct UnknownAttributeError {
    model: Box<str>,
    name: Box<str>,
}

impl std::error::Error for UnknownAttributeError {}

impl core::fmt::Display for UnknownAttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown attribute `{}` for `{}`", self.name, self.model)
    }
}

impl Error {
    /// Creates an unknown attribute error.
    pub fn unknown_attribute(model: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownAttribute(UnknownAttributeError {
            model: model.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown attribute error.
    pub fn is_unknown_attribute(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownAttribute(_)))
    }
}
