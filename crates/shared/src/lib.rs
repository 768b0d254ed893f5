//! Cyoa Protocol - Wire types for the story HTTP API
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod requests;
pub mod responses;

pub use requests::{ContinueStoryRequest, StartStoryRequest};
pub use responses::{Acknowledgement, StoryData, StoryEnvelope, TurnData, TurnEnvelope};
