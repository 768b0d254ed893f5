//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod easy_diffusion;
pub mod image_render;
pub mod memory_store;
pub mod openai;
pub mod ports;
pub mod sqlite_store;
