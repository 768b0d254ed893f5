//! Request bodies accepted by the story endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /`: begin a new story with the player's opening line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartStoryRequest {
    pub prompt: String,
}

/// Body of `PUT /`: continue an existing story.
///
/// `id` stays a plain string so an unknown or malformed id surfaces as a
/// missing story rather than a body decoding error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueStoryRequest {
    pub id: String,
    pub prompt: String,
}
