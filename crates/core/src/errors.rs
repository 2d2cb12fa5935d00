use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown request status `{0}`")]
    UnknownStatus(String),
    #[error("field `{field}` is invalid: {message}")]
    InvalidField { field: String, message: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField { field: field.into(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::DomainError;

    #[test]
    fn invalid_field_renders_field_and_message() {
        let error = DomainError::invalid_field("quantity", "must be positive");
        assert_eq!(error.to_string(), "field `quantity` is invalid: must be positive");
    }
}
