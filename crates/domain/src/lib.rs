//! Cyoa domain types.
//!
//! A [`Story`] is an append-only sequence of [`Turn`]s addressed by a [`StoryId`].
//! Nothing in this crate performs I/O; the engine owns persistence and the
//! calls to the storyteller and render backends.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{Story, StoryBeat, Turn};
pub use error::DomainError;
pub use ids::StoryId;
