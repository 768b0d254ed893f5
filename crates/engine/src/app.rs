//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{ImageGenPort, LlmPort, RandomPort, StoryRepo};
use crate::use_cases::story::{ContinueStory, StartStory, StoryUseCases};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub story: StoryUseCases,
}

impl App {
    /// Wire use cases onto the given adapters.
    pub fn new(
        stories: Arc<dyn StoryRepo>,
        llm: Arc<dyn LlmPort>,
        images: Arc<dyn ImageGenPort>,
        random: Arc<dyn RandomPort>,
        temperature: f32,
    ) -> Self {
        let continue_story = Arc::new(ContinueStory::new(
            stories.clone(),
            llm,
            images,
            temperature,
        ));
        let start = Arc::new(StartStory::new(
            stories,
            random,
            continue_story.clone(),
        ));

        Self {
            use_cases: UseCases {
                story: StoryUseCases::new(start, continue_story),
            },
        }
    }
}
