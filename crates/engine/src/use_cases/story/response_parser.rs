//! Storyteller reply parser.
//!
//! The storyteller is asked for a JSON object with non-empty `narrative` and
//! `imagery` strings and an optional `endOfGame` flag. Anything else is a
//! [`MalformedResponse`]; no repair is attempted.

use cyoa_domain::{DomainError, StoryBeat};
use serde::Deserialize;

/// Why a storyteller reply was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedResponse {
    #[error("reply is not a JSON object: {0}")]
    NotJson(String),
    #[error("reply is missing `{0}`")]
    MissingField(&'static str),
    #[error("reply failed validation: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct RawStoryBeat {
    #[serde(default)]
    narrative: Option<String>,
    #[serde(default)]
    imagery: Option<String>,
    #[serde(default, rename = "endOfGame")]
    end_of_game: Option<serde_json::Value>,
}

/// Parse and validate one storyteller reply.
pub fn parse_story_beat(raw: &str) -> Result<StoryBeat, MalformedResponse> {
    let parsed: RawStoryBeat =
        serde_json::from_str(raw).map_err(|e| MalformedResponse::NotJson(e.to_string()))?;

    let narrative = parsed
        .narrative
        .ok_or(MalformedResponse::MissingField("narrative"))?;
    let imagery = parsed
        .imagery
        .ok_or(MalformedResponse::MissingField("imagery"))?;
    // Only a literal `true` ends the game
    let end_of_game = matches!(parsed.end_of_game, Some(serde_json::Value::Bool(true)));

    Ok(StoryBeat::new(narrative, imagery)?.with_end_of_game(end_of_game))
}
