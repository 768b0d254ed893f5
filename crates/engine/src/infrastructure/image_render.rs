//! Image render client
//!
//! Implements the ImageGenPort trait on top of a [`RenderTransport`]: submit one
//! render job, then poll its stream handle until the backend reports a
//! finished image.
//!
//! Poll responses that are not 2xx, that do not decode, that are not yet
//! `succeeded`, or that succeeded without output all count as "not ready".
//! Only a failed submit or a transport failure while polling ends the job
//! early. The loop is bounded by [`PollPolicy::max_attempts`] when set; the
//! default is unbounded, so callers wanting a deadline should also wrap the
//! future in a timeout.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{
    ImageGenError, ImageGenPort, RawResponse, RenderRequest, RenderTransport, SleepPort,
};

/// Delay between polls when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Exclusive upper bound for the per-process seed.
pub const SEED_RANGE: u64 = 100_000_000;

/// Status the render backend reports for a finished job.
const STATUS_SUCCEEDED: &str = "succeeded";

/// Fixed render parameters shared by every job.
///
/// Never mutated after construction; each job copies it into a fresh
/// [`RenderRequest`] together with the prompt and model.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDefaults {
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
}

impl RenderDefaults {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Merge a prompt and model into a new request.
    pub fn to_request(&self, prompt: &str, model: &str) -> RenderRequest {
        RenderRequest {
            prompt: prompt.to_string(),
            negative_prompt: self.negative_prompt.clone(),
            seed: self.seed,
            width: self.width,
            height: self.height,
            num_outputs: self.num_outputs,
            num_inference_steps: self.num_inference_steps,
            guidance_scale: self.guidance_scale,
            prompt_strength: self.prompt_strength,
            sampler_name: self.sampler_name.clone(),
            hypernetwork_strength: self.hypernetwork_strength,
            lora_alpha: self.lora_alpha,
            preserve_init_image_color_profile: self.preserve_init_image_color_profile,
            use_stable_diffusion_model: model.to_string(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            negative_prompt: String::new(),
            seed: 0,
            width: 768,
            height: 512,
            num_outputs: 1,
            num_inference_steps: 10,
            guidance_scale: 7.1,
            prompt_strength: 0.0,
            sampler_name: "ddim".to_string(),
            hypernetwork_strength: 0.0,
            lora_alpha: 0.0,
            preserve_init_image_color_profile: false,
        }
    }
}

/// How long to keep polling a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the job finishes; `Some(n)` polls at most n times (n >= 1)
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Client that drives one render job per prompt.
pub struct ImageRenderClient {
    transport: Arc<dyn RenderTransport>,
    sleeper: Arc<dyn SleepPort>,
    defaults: RenderDefaults,
    model: String,
    policy: PollPolicy,
}

impl ImageRenderClient {
    pub fn new(
        transport: Arc<dyn RenderTransport>,
        sleeper: Arc<dyn SleepPort>,
        defaults: RenderDefaults,
        model: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            defaults,
            model: model.into(),
            policy,
        }
    }

    /// Submit a job and return the stream handle to poll.
    async fn submit(&self, request: &RenderRequest) -> Result<RenderTicket, ImageGenError> {
        tracing::info!("Sending render request");
        let response = self
            .transport
            .submit(request)
            .await
            .map_err(|e| ImageGenError::SubmitFailed(e.to_string()))?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Render request failed");
            return Err(ImageGenError::SubmitFailed(format!(
                "render service returned status {}",
                response.status
            )));
        }

        let ticket: RenderTicket = serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!(error = %e, body = %response.body, "Render response parse failed");
            ImageGenError::SubmitFailed(format!("undecodable render response: {e}"))
        })?;

        tracing::info!(
            stream = %ticket.stream,
            task = ?ticket.task,
            queue = ?ticket.queue,
            status = %ticket.status,
            "Render request successful"
        );
        Ok(ticket)
    }

    /// One status request. Only a transport failure is an error.
    async fn poll_once(&self, stream: &str) -> Result<PollOutcome, ImageGenError> {
        let response = self
            .transport
            .poll(stream)
            .await
            .map_err(|e| ImageGenError::PollFailed(e.to_string()))?;
        Ok(interpret_poll(&response))
    }

    async fn wait_for_image(&self, stream: &str) -> Result<String, ImageGenError> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            if let PollOutcome::Ready(image) = self.poll_once(stream).await? {
                tracing::info!(stream = %stream, attempt, "Image ready");
                return Ok(image);
            }

            if let Some(max_attempts) = self.policy.max_attempts {
                if attempt >= max_attempts {
                    tracing::warn!(stream = %stream, attempts = attempt, "Giving up on render job");
                    return Err(ImageGenError::PollLimitReached { attempts: attempt });
                }
            }

            tracing::debug!(stream = %stream, attempt, "Waiting for image");
            self.sleeper.sleep(self.policy.interval).await;
        }
    }
}

#[async_trait]
impl ImageGenPort for ImageRenderClient {
    async fn render(&self, prompt: &str) -> Result<String, ImageGenError> {
        let request = self.defaults.to_request(prompt, &self.model);
        let ticket = self.submit(&request).await?;
        self.wait_for_image(&ticket.stream).await
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Pending,
    Ready(String),
}

fn interpret_poll(response: &RawResponse) -> PollOutcome {
    if !response.is_success() {
        tracing::debug!(status = response.status, "Image request failed, treating as not ready");
        return PollOutcome::Pending;
    }

    let stream_response: StreamResponse = match serde_json::from_str(&response.body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "Image json parse failed, treating as not ready");
            return PollOutcome::Pending;
        }
    };

    if stream_response.status.as_deref() != Some(STATUS_SUCCEEDED) {
        return PollOutcome::Pending;
    }

    if let Some(task) = &stream_response.task_data {
        tracing::debug!(
            request_id = ?task.request_id,
            session_id = ?task.session_id,
            model = ?task.use_stable_diffusion_model,
            "Render task finished"
        );
    }

    match stream_response.output.into_iter().next() {
        Some(output) => {
            tracing::debug!(seed = ?output.seed, path = ?output.path_abs, "Received image output");
            PollOutcome::Ready(output.data)
        }
        None => {
            tracing::info!("No image in stream response");
            PollOutcome::Pending
        }
    }
}

// =============================================================================
// Render API types
// =============================================================================

/// Body returned by a successful submit.
#[derive(Debug, Deserialize)]
struct RenderTicket {
    #[serde(default)]
    status: String,
    #[serde(default)]
    queue: Option<u32>,
    stream: String,
    #[serde(default)]
    task: Option<u64>,
}

/// Body returned by a stream poll.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    task_data: Option<TaskData>,
    #[serde(default)]
    output: Vec<RenderOutput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaskData {
    // Shape varies between backend versions
    request_id: Option<serde_json::Value>,
    session_id: Option<serde_json::Value>,
    use_stable_diffusion_model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RenderOutput {
    data: String,
    #[serde(default)]
    seed: Option<f64>,
    #[serde(default)]
    path_abs: Option<String>,
}
