use thiserror::Error;

/// Failures surfaced by the tab and shortcut repositories.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A required field was empty. Nothing was persisted.
    #[error("{0} must not be empty")]
    Validation(&'static str),
    /// The referenced record no longer exists.
    #[error("no {kind} with id `{id}`")]
    NotFound { kind: &'static str, id: String },
    /// Attempted mutation of the protected default tab.
    #[error("the default tab cannot be {0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl BoardError {
    pub(crate) fn shortcut_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "shortcut",
            id: id.to_string(),
        }
    }

    pub(crate) fn tab_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "tab",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
