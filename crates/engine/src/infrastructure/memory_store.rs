//! In-memory story storage for development and testing.
//!
//! Contents are lost when the process exits.

use async_trait::async_trait;
use cyoa_domain::{Story, StoryId};
use dashmap::DashMap;

use crate::infrastructure::ports::{RepoError, StoryRepo};

#[derive(Default)]
pub struct InMemoryStoryRepo {
    stories: DashMap<StoryId, Story>,
}

impl InMemoryStoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[async_trait]
impl StoryRepo for InMemoryStoryRepo {
    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError> {
        Ok(self.stories.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, story: &Story) -> Result<(), RepoError> {
        self.stories.insert(story.id(), story.clone());
        Ok(())
    }
}
