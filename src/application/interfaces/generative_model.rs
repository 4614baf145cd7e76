use async_trait::async_trait;

use crate::domain::DomainError;

/// An image attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Sampling knobs passed through to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 256,
        }
    }
}

/// One prompt for a generative model: a fixed system instruction, the user
/// text and, for vision calls, an image.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub sampling: SamplingParams,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            image: None,
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Sends a prompt to a hosted generative model and returns its text reply.
///
/// Implementors own transport and wire format. They are expected to be
/// cheap to share across tasks since every call is issued on a spawned
/// worker so it can be abandoned on timeout.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError>;

    fn model_name(&self) -> &str;
}
