//! Story entity - An append-only transcript of player turns
//!
//! A story is created empty and grows by exactly one [`Turn`] per successful
//! continuation. Committed turns are never edited or removed, so replaying
//! `turns` always reproduces the chat context that produced the next turn.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::StoryId;

/// A persisted story, addressed by its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    id: StoryId,
    /// Reserved for a generated title; currently always empty.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    turns: Vec<Turn>,
    #[serde(default)]
    ended: bool,
}

impl Story {
    /// Create an empty story with no turns.
    pub fn new(id: StoryId) -> Self {
        Self {
            id,
            title: String::new(),
            turns: Vec::new(),
            ended: false,
        }
    }

    /// Fixed at creation.
    pub fn id(&self) -> StoryId {
        self.id
    }

    /// Committed turns in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// True once a committed beat signalled the end of the game.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Append a completed turn built from the player's input and the parsed beat.
    ///
    /// A missing image is stored as an empty payload; such turns are kept as-is.
    pub fn record_turn(
        &mut self,
        user_input: impl Into<String>,
        beat: StoryBeat,
        rendered_image: Option<String>,
    ) -> &Turn {
        if beat.end_of_game {
            self.ended = true;
        }
        self.turns.push(Turn {
            user_input: user_input.into(),
            narrative: beat.narrative,
            imagery: beat.imagery,
            rendered_image: rendered_image.unwrap_or_default(),
        });
        // The push above guarantees a last element.
        &self.turns[self.turns.len() - 1]
    }
}

/// One player input plus the storyteller's answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub user_input: String,
    pub narrative: String,
    pub imagery: String,
    /// Encoded image payload, empty when rendering failed.
    #[serde(default)]
    pub rendered_image: String,
}

impl Turn {
    pub fn has_image(&self) -> bool {
        !self.rendered_image.is_empty()
    }
}

/// A validated storyteller reply: prose plus an image prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBeat {
    pub narrative: String,
    pub imagery: String,
    pub end_of_game: bool,
}

impl StoryBeat {
    /// Build a beat, rejecting empty narrative or imagery.
    pub fn new(
        narrative: impl Into<String>,
        imagery: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let narrative = narrative.into();
        let imagery = imagery.into();
        if narrative.is_empty() {
            return Err(DomainError::validation("narrative cannot be empty"));
        }
        if imagery.is_empty() {
            return Err(DomainError::validation("imagery cannot be empty"));
        }
        Ok(Self {
            narrative,
            imagery,
            end_of_game: false,
        })
    }

    pub fn with_end_of_game(mut self, end_of_game: bool) -> Self {
        self.end_of_game = end_of_game;
        self
    }
}
