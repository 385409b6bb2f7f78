use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown post category `{value}`")]
    UnknownCategory { value: String },
    #[error("malformed post slug `{value}`")]
    MalformedSlug { value: String },
}

impl DomainError {
    pub fn unknown_category(value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            value: value.into(),
        }
    }

    pub fn malformed_slug(value: impl Into<String>) -> Self {
        Self::MalformedSlug {
            value: value.into(),
        }
    }
}
