//! Start story use case.
//!
//! Allocates and persists an empty story, then runs its first turn through
//! [`ContinueStory`] with the same input.

use std::sync::Arc;

use cyoa_domain::{Story, StoryId};

use super::continue_story::ContinueStory;
use super::error::StoryError;
use crate::infrastructure::ports::{RandomPort, StoryRepo};

pub struct StartStory {
    stories: Arc<dyn StoryRepo>,
    random: Arc<dyn RandomPort>,
    continue_story: Arc<ContinueStory>,
}

impl StartStory {
    pub fn new(
        stories: Arc<dyn StoryRepo>,
        random: Arc<dyn RandomPort>,
        continue_story: Arc<ContinueStory>,
    ) -> Self {
        Self {
            stories,
            random,
            continue_story,
        }
    }

    /// Create a story and play its opening turn.
    ///
    /// The empty story stays persisted even when the opening turn fails.
    pub async fn execute(&self, initial_prompt: String) -> Result<Story, StoryError> {
        let story = Story::new(StoryId::from_uuid(self.random.gen_uuid()));
        self.stories.save(&story).await?;

        tracing::info!(story_id = %story.id(), "Story created");

        self.continue_story.execute(story.id(), initial_prompt).await
    }
}
