//! Response envelopes returned by the story endpoints.
//!
//! Every response carries a `success` flag. Failures carry an `error` message
//! and never a story payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Story payloads
// =============================================================================

/// A story as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    pub id: Uuid,
    pub title: String,
    pub turns: Vec<TurnData>,
    pub ended: bool,
}

/// One committed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnData {
    pub user_input: String,
    pub narrative: String,
    pub imagery: String,
    /// Inline encoded image, empty when rendering failed
    pub rendered_image: String,
}

// =============================================================================
// Envelopes
// =============================================================================

/// Envelope for story creation and for every failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEnvelope {
    pub success: bool,
    pub story: Option<StoryData>,
    pub error: Option<String>,
}

impl StoryEnvelope {
    pub fn success(story: StoryData) -> Self {
        Self {
            success: true,
            story: Some(story),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            story: None,
            error: Some(message.into()),
        }
    }
}

/// Envelope for a successful continuation: only the newly added turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEnvelope {
    pub success: bool,
    pub id: Uuid,
    pub turn: TurnData,
}

impl TurnEnvelope {
    pub fn new(id: Uuid, turn: TurnData) -> Self {
        Self {
            success: true,
            id,
            turn,
        }
    }
}

/// Bare acknowledgement for requests that carry no story operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
}

impl Default for Acknowledgement {
    fn default() -> Self {
        Self { success: true }
    }
}
