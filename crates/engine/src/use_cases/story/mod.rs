//! Story use cases.
//!
//! A turn flows through:
//! 1. Load the story (or create it, for StartStory)
//! 2. Rebuild the chat transcript from its committed turns
//! 3. Ask the storyteller for the next beat
//! 4. Validate the reply
//! 5. Render the beat's imagery (failure tolerated)
//! 6. Append the turn and persist the story once

use std::sync::Arc;

mod continue_story;
mod error;
mod response_parser;
mod start;
mod transcript;

pub use continue_story::ContinueStory;
pub use error::{StoryError, UnavailableReason};
pub use response_parser::{parse_story_beat, MalformedResponse};
pub use start::StartStory;
pub use transcript::{assistant_reply, build_transcript, PRIMING_MESSAGE_COUNT};

/// Container for story use cases.
pub struct StoryUseCases {
    pub start: Arc<StartStory>,
    pub continue_story: Arc<ContinueStory>,
}

impl StoryUseCases {
    pub fn new(start: Arc<StartStory>, continue_story: Arc<ContinueStory>) -> Self {
        Self {
            start,
            continue_story,
        }
    }
}
