use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is required")]
    MissingAttribute(&'static str),

    #[error("Invalid attribute {name}: {reason}")]
    InvalidAttribute { name: &'static str, reason: String },

    #[error("Malformed detection label {label:?}: {reason}")]
    MalformedLabel { label: String, reason: String },

    #[error(transparent)]
    Vision(anyhow::Error),
}

impl Error {
    pub(crate) fn malformed(label: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLabel {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_malformed_label(&self) -> bool {
        matches!(self, Self::MalformedLabel { .. })
    }
}
