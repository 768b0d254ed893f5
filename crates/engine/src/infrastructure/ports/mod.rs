//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Story storage (could swap SQLite -> any key-value store)
//! - Chat completions (could swap OpenAI -> other chat backends)
//! - Image rendering (could swap Easy Diffusion -> other)
//! - Clock/Random/Sleep (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::StoryRepo;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, ImageGenPort, LlmChoice, LlmPort, LlmRequest, LlmResponse, MessageRole,
    RawResponse, RenderRequest, RenderTransport,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockImageGenPort, MockLlmPort};
#[cfg(test)]
pub use repos::MockStoryRepo;
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort, SleepPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ImageGenError, LlmError, RepoError, TransportError};
