//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod story;

pub use story::StoryUseCases;
