//! Chat transcript reconstruction.
//!
//! The transcript is a pure function of the story's committed turns: the fixed
//! priming prefix, one user/assistant pair per turn, then the new input.
//! Assistant messages are re-serialized from the stored fields rather than
//! kept verbatim, so quotes and newlines in the prose are always escaped.

use cyoa_domain::Story;
use serde::Serialize;

use crate::infrastructure::ports::ChatMessage;
use crate::prompt_templates::{
    EXAMPLE_IMAGERY, EXAMPLE_NARRATIVE, EXAMPLE_USER_INPUT, GAME_START_SENTINEL, OUTPUT_FORMAT,
    STORYTELLER_PERSONA,
};

/// Messages emitted before any story turn: two system prompts, the example
/// exchange and the start sentinel.
pub const PRIMING_MESSAGE_COUNT: usize = 5;

#[derive(Serialize)]
struct AssistantReply<'a> {
    narrative: &'a str,
    imagery: &'a str,
}

/// Encode a narrative/imagery pair the way the storyteller is asked to reply.
pub fn assistant_reply(narrative: &str, imagery: &str) -> String {
    // Two string fields always serialize.
    serde_json::to_string(&AssistantReply { narrative, imagery }).unwrap_or_default()
}

/// Build the full message list for the next turn of `story`.
pub fn build_transcript(story: &Story, user_input: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(PRIMING_MESSAGE_COUNT + story.turns().len() * 2 + 1);

    messages.push(ChatMessage::system(STORYTELLER_PERSONA));
    messages.push(ChatMessage::system(OUTPUT_FORMAT));
    messages.push(ChatMessage::user(EXAMPLE_USER_INPUT));
    messages.push(ChatMessage::assistant(assistant_reply(
        EXAMPLE_NARRATIVE,
        EXAMPLE_IMAGERY,
    )));
    messages.push(ChatMessage::user(GAME_START_SENTINEL));

    for turn in story.turns() {
        messages.push(ChatMessage::user(turn.user_input.as_str()));
        messages.push(ChatMessage::assistant(assistant_reply(
            &turn.narrative,
            &turn.imagery,
        )));
    }

    messages.push(ChatMessage::user(user_input));
    messages
}
