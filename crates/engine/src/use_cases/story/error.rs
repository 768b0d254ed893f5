//! Story operation errors.

use cyoa_domain::StoryId;

use super::response_parser::MalformedResponse;
use crate::infrastructure::ports::{LlmError, RepoError};

/// Errors that abort a story turn. Image failures never appear here.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("Story not found: {0}")]
    NotFound(StoryId),
    /// Backend gave no usable reply. The reason is for logs only.
    #[error("Storyteller is unavailable")]
    StorytellerUnavailable(#[source] UnavailableReason),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Internal distinction behind [`StoryError::StorytellerUnavailable`].
#[derive(Debug, thiserror::Error)]
pub enum UnavailableReason {
    #[error("chat backend returned no choices")]
    NoChoices,
    #[error(transparent)]
    Backend(#[from] LlmError),
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

impl StoryError {
    /// Message safe to show to callers.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Story not found",
            Self::StorytellerUnavailable(_) => "Storyteller is unavailable",
            Self::Repo(_) => "Storage is unavailable",
        }
    }
}

impl From<UnavailableReason> for StoryError {
    fn from(reason: UnavailableReason) -> Self {
        Self::StorytellerUnavailable(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unavailable_variants_share_a_public_message() {
        let no_choices = StoryError::from(UnavailableReason::NoChoices);
        let malformed = StoryError::from(UnavailableReason::Malformed(
            MalformedResponse::MissingField("imagery"),
        ));
        let backend = StoryError::from(UnavailableReason::Backend(LlmError::RequestFailed(
            "timeout".into(),
        )));

        for err in [&no_choices, &malformed, &backend] {
            assert_eq!(err.to_string(), "Storyteller is unavailable");
            assert_eq!(err.public_message(), "Storyteller is unavailable");
        }
    }

    #[test]
    fn unavailable_keeps_reason_as_source() {
        let err = StoryError::from(UnavailableReason::Malformed(MalformedResponse::MissingField(
            "imagery",
        )));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("reply is missing `imagery`"));
    }

    #[test]
    fn repo_errors_are_not_leaked() {
        let err = StoryError::from(RepoError::database("save_story", "disk full"));
        assert_eq!(err.public_message(), "Storage is unavailable");
    }
}
