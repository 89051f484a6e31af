use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The value must be present (not null, not a blank string)
    Required,

    /// String length bounds, inclusive
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
}

impl Constraint {
    /// Returns the failure message, or `None` if the value satisfies the
    /// constraint.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Constraint::Required => value.is_blank().then(|| "can't be blank".to_string()),
            Constraint::Length { min, max } => {
                // Absent values are the presence constraint's business.
                let len = value.as_str()?.chars().count();

                if min == max && min.is_some() && Some(len) != *min {
                    return Some(format!(
                        "is the wrong length (should be {} characters)",
                        min.unwrap_or_default()
                    ));
                }

                match (min, max) {
                    (Some(min), _) if len < *min => {
                        Some(format!("is too short (minimum is {min} characters)"))
                    }
                    (_, Some(max)) if len > *max => {
                        Some(format!("is too long (maximum is {max} characters)"))
                    }
                    _ => None,
                }
            }
        }
    }
}
