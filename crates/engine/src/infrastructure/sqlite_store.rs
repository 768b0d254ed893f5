//! SQLite-backed story storage.

use async_trait::async_trait;
use cyoa_domain::{Story, StoryId};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, RepoError, StoryRepo};

/// SQLite implementation of the story key-value store.
///
/// Each story is stored whole as JSON under its id.
pub struct SqliteStoryRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteStoryRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("stories", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                id TEXT PRIMARY KEY NOT NULL,
                story_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("stories", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl StoryRepo for SqliteStoryRepo {
    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError> {
        let row = sqlx::query("SELECT story_json FROM stories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_story", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("story_json");
                let story = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(story))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, story: &Story) -> Result<(), RepoError> {
        let json = serde_json::to_string(story).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO stories (id, story_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                story_json = excluded.story_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(story.id().to_string())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_story", e))?;

        Ok(())
    }
}
