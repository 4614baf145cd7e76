use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::{
    GenerationRequest, GenerativeModel, ImageFetcher, SamplingParams, UsageTracker,
};
use crate::domain::DomainError;

const KEYWORD_SYSTEM_PROMPT: &str = "\
You are an art curator. Convert the provided abstract text into a search query \
for an art database. Focus on visual subjects, art styles, and specific painter \
names. Return ONLY the search keywords separated by spaces. Do not use markdown.";

const EXPLAIN_SYSTEM_PROMPT: &str = "\
You are an art historian and curator who explains why a work of art answers a \
piece of philosophical or abstract text. Write in clear, engaging prose without \
markdown headings or bullet points.";

const KEYWORD_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 40,
    max_output_tokens: 100,
};

const EXPLAIN_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 40,
    max_output_tokens: 512,
};

/// Rough tokens per whitespace-separated word.
const TOKENS_PER_WORD: f64 = 1.3;

/// The image dominates a vision call, so explanations are billed at a flat
/// estimate instead of by word count.
const EXPLAIN_INPUT_TOKENS: u64 = 1_300;
const EXPLAIN_OUTPUT_TOKENS: u64 = 330;

pub const DEFAULT_IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const MISSING_MODEL: &str = "GEMINI_API_KEY environment variable not set";

/// Turns free text into art search keywords and explains how a found artwork
/// relates to that text.
///
/// Each model call runs on a spawned task raced against a timer. When the
/// timer wins the task is aborted and a [`DomainError::Timeout`] is returned
/// straight away; whether the underlying request is actually torn down is up
/// to the runtime. Successful calls are counted with the [`UsageTracker`];
/// accounting failures are logged and otherwise ignored.
pub struct Interpreter {
    model: Option<Arc<dyn GenerativeModel>>,
    image_fetcher: Arc<dyn ImageFetcher>,
    usage_tracker: Arc<UsageTracker>,
    image_fetch_timeout: Duration,
}

impl Interpreter {
    /// `model` is `None` when no credential is configured; both operations
    /// then fail with a configuration error before touching the network.
    pub fn new(
        model: Option<Arc<dyn GenerativeModel>>,
        image_fetcher: Arc<dyn ImageFetcher>,
        usage_tracker: Arc<UsageTracker>,
    ) -> Self {
        Self {
            model,
            image_fetcher,
            usage_tracker,
            image_fetch_timeout: DEFAULT_IMAGE_FETCH_TIMEOUT,
        }
    }

    pub fn with_image_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.image_fetch_timeout = timeout;
        self
    }

    pub async fn generate_keywords(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<String, DomainError> {
        let model = self.model()?;

        let request = GenerationRequest::new(KEYWORD_SYSTEM_PROMPT, text)
            .with_sampling(KEYWORD_SAMPLING);

        let raw = generate_with_timeout(model, request, timeout).await?;
        let keywords = clean_keywords(&raw);
        if keywords.is_empty() {
            return Err(DomainError::upstream("Model returned no keywords"));
        }
        debug!("Generated keywords: {keywords}");

        self.track(estimate_tokens(text), estimate_tokens(&keywords))
            .await;

        Ok(keywords)
    }

    pub async fn explain_artwork(
        &self,
        image_url: &str,
        original_query: &str,
        title: &str,
        artist: &str,
        timeout: Duration,
    ) -> Result<String, DomainError> {
        let model = self.model()?;

        info!("Downloading artwork image from {image_url}");
        let image = match tokio::time::timeout(
            self.image_fetch_timeout,
            self.image_fetcher.fetch(image_url),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(DomainError::timeout(format!(
                    "Image download timed out after {} seconds",
                    self.image_fetch_timeout.as_secs()
                )))
            }
        };
        debug!("Fetched {} bytes ({})", image.bytes.len(), image.mime_type);

        let request = GenerationRequest::new(
            EXPLAIN_SYSTEM_PROMPT,
            explanation_prompt(original_query, title, artist),
        )
        .with_image(image)
        .with_sampling(EXPLAIN_SAMPLING);

        let explanation = generate_with_timeout(model, request, timeout)
            .await?
            .trim()
            .to_string();
        if explanation.is_empty() {
            return Err(DomainError::upstream("Model returned an empty explanation"));
        }

        self.track(EXPLAIN_INPUT_TOKENS, EXPLAIN_OUTPUT_TOKENS).await;

        Ok(explanation)
    }

    fn model(&self) -> Result<Arc<dyn GenerativeModel>, DomainError> {
        self.model
            .clone()
            .ok_or_else(|| DomainError::configuration(MISSING_MODEL))
    }

    async fn track(&self, input_tokens: u64, output_tokens: u64) {
        if let Err(e) = self
            .usage_tracker
            .track_request(input_tokens, output_tokens)
            .await
        {
            warn!("Failed to record API usage: {e}");
        }
    }
}

async fn generate_with_timeout(
    model: Arc<dyn GenerativeModel>,
    request: GenerationRequest,
    timeout: Duration,
) -> Result<String, DomainError> {
    debug!(
        "Calling {} (image={}, timeout={:?})",
        model.model_name(),
        request.has_image(),
        timeout
    );

    let mut handle = tokio::spawn(async move { model.generate(request).await });

    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(DomainError::internal(format!(
            "Generation task failed: {join_error}"
        ))),
        Err(_) => {
            handle.abort();
            Err(DomainError::timeout(format!(
                "Request timed out after {} seconds",
                timeout.as_secs_f64()
            )))
        }
    }
}

/// Flatten model output to a single line of space-separated terms, dropping
/// any code-fence backticks around it.
fn clean_keywords(raw: &str) -> String {
    raw.trim()
        .trim_matches('`')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn estimate_tokens(text: &str) -> u64 {
    (text.split_whitespace().count() as f64 * TOKENS_PER_WORD) as u64
}

fn explanation_prompt(original_query: &str, title: &str, artist: &str) -> String {
    format!(
        "The following text was used to search for art:\n\
         \"{original_query}\"\n\n\
         The attached image is \"{title}\" by {artist}.\n\n\
         Explain how this artwork relates to the text. Cover:\n\
         1. Visual elements: composition, colour, light and subject matter.\n\
         2. Thematic connection: which ideas in the text the work expresses.\n\
         3. Interpretation: what a viewer might feel or understand through it.\n\n\
         Aim for 150 to 250 words."
    )
}
