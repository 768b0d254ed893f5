//! Continue story use case.
//!
//! Runs one turn: load, ask the storyteller, parse, render the imagery, then
//! persist the story once with the new turn appended. Nothing is written
//! unless every step before rendering succeeded.

use std::sync::Arc;

use cyoa_domain::{Story, StoryId};

use super::error::{StoryError, UnavailableReason};
use super::response_parser::parse_story_beat;
use super::transcript::build_transcript;
use crate::infrastructure::ports::{ImageGenPort, LlmPort, LlmRequest, StoryRepo};

pub struct ContinueStory {
    stories: Arc<dyn StoryRepo>,
    llm: Arc<dyn LlmPort>,
    images: Arc<dyn ImageGenPort>,
    temperature: f32,
}

impl ContinueStory {
    pub fn new(
        stories: Arc<dyn StoryRepo>,
        llm: Arc<dyn LlmPort>,
        images: Arc<dyn ImageGenPort>,
        temperature: f32,
    ) -> Self {
        Self {
            stories,
            llm,
            images,
            temperature,
        }
    }

    /// Append one turn to an existing story.
    ///
    /// # Returns
    /// * `Ok(Story)` - The story with the new turn committed
    /// * `Err(StoryError::NotFound)` - No story with this id
    /// * `Err(StoryError::StorytellerUnavailable)` - No usable reply; nothing was saved
    pub async fn execute(&self, story_id: StoryId, user_input: String) -> Result<Story, StoryError> {
        // 1. Load
        let mut story = self
            .stories
            .get(story_id)
            .await?
            .ok_or(StoryError::NotFound(story_id))?;

        // 2. Transcript
        let messages = build_transcript(&story, &user_input);
        let request = LlmRequest::new(messages).with_temperature(self.temperature);

        // 3. Storyteller
        let response = self.llm.generate(request).await.map_err(|e| {
            tracing::warn!(story_id = %story_id, error = %e, "Chat backend request failed");
            UnavailableReason::Backend(e)
        })?;
        let content = response.first_content().ok_or_else(|| {
            tracing::warn!(story_id = %story_id, response_id = ?response.id, "Chat backend returned no choices");
            UnavailableReason::NoChoices
        })?;

        // 4. Parse
        let beat = parse_story_beat(content).map_err(|e| {
            tracing::warn!(
                story_id = %story_id,
                error = %e,
                content = %content,
                "Storyteller reply was malformed"
            );
            UnavailableReason::Malformed(e)
        })?;

        // 5. Render; failures degrade to an empty image
        let rendered_image = match self.images.render(&beat.imagery).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(
                    story_id = %story_id,
                    error = %e,
                    "Image render failed, committing turn without image"
                );
                None
            }
        };

        // 6. Commit
        let ended = beat.end_of_game;
        story.record_turn(user_input, beat, rendered_image);
        self.stories.save(&story).await?;

        tracing::info!(
            story_id = %story_id,
            turn_count = story.turns().len(),
            ended,
            "Story turn committed"
        );

        Ok(story)
    }
}
