use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{GenerationRequest, GenerativeModel};
use crate::domain::DomainError;

const DEFAULT_KEYWORDS: &str = "solitary figure contemplation chiaroscuro Rembrandt";
const DEFAULT_EXPLANATION: &str = "\
The painting answers the text through its handling of light: a single figure \
emerges from deep shadow, and the surrounding darkness gives weight to the \
quiet moment of reflection the words describe.";

/// Deterministic stand-in for a hosted model.
///
/// Text-only prompts get the keyword reply, prompts carrying an image get
/// the explanation reply. An optional delay simulates a slow backend.
pub struct MockGenerativeModel {
    keywords: String,
    explanation: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockGenerativeModel {
    pub fn new() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.to_string(),
            explanation: DEFAULT_EXPLANATION.to_string(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls that started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerativeModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeModel for MockGenerativeModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockGenerativeModel prompt: {}", request.prompt);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if request.has_image() {
            Ok(self.explanation.clone())
        } else {
            Ok(self.keywords.clone())
        }
    }

    fn model_name(&self) -> &str {
        "mock-generative-model"
    }
}
