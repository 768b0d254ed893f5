//! Repository port traits for story storage.

use async_trait::async_trait;
use cyoa_domain::{Story, StoryId};

use super::error::RepoError;

/// Key-value store of stories addressed by id.
///
/// No transactions and no versioning: `save` overwrites whatever is stored
/// under the story's id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryRepo: Send + Sync {
    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError>;
    async fn save(&self, story: &Story) -> Result<(), RepoError>;
}
