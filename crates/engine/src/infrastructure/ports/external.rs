//! External service port traits (chat completions, image rendering).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{ImageGenError, LlmError, TransportError};

// =============================================================================
// LLM Types
// =============================================================================

/// LLM request/response types
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The full transcript, priming turns included
    pub messages: Vec<ChatMessage>,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Response from the chat backend.
///
/// An empty `choices` list is a valid response meaning the backend had nothing to offer.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Backend-assigned response id, when provided
    pub id: Option<String>,
    pub choices: Vec<LlmChoice>,
}

impl LlmResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.content.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LlmChoice {
    pub content: String,
}

impl LlmChoice {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Image Rendering Types
// =============================================================================

/// Render backend request body.
///
/// Built fresh for every job from the immutable render defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub num_outputs: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
    pub prompt_strength: f64,
    pub sampler_name: String,
    pub hypernetwork_strength: f64,
    pub lora_alpha: f64,
    pub preserve_init_image_color_profile: bool,
    pub use_stable_diffusion_model: String,
}

/// Status and body of a raw HTTP exchange, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw request/response functions against the render service.
///
/// Implementations only fail when no response arrives at all; status codes
/// and bodies are handed back for the caller to interpret. A body that cannot
/// be read after the status arrived comes back empty.
#[async_trait]
pub trait RenderTransport: Send + Sync {
    async fn submit(&self, request: &RenderRequest) -> Result<RawResponse, TransportError>;
    async fn poll(&self, stream: &str) -> Result<RawResponse, TransportError>;
}

/// Turns an imagery prompt into an encoded image payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenPort: Send + Sync {
    async fn render(&self, prompt: &str) -> Result<String, ImageGenError>;
}
