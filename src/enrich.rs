//! # Enrichment Module
//!
//! Asks a text completion model for a one-sentence catalog blurb built from a
//! site's title, description and keywords. Enrichment is best-effort: a
//! missing model, an empty page or any request failure all yield an empty
//! string, and the pipeline carries on.

use rig::{
    agent::{Agent, AgentBuilder},
    completion::{CompletionModel, Prompt},
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::crawler::SiteInfo;

/// Configuration for the enricher
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Language the summary is written in
    pub language: String,

    /// Minimum summary length in characters
    pub min_chars: usize,

    /// Maximum summary length in characters
    pub max_chars: usize,

    /// Sampling temperature
    pub temperature: f64,

    /// Timeout in milliseconds for a single completion call
    pub timeout_ms: u64,

    /// Delay in milliseconds between consecutive completion calls
    pub rate_limit_ms: u64,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            language: "Simplified Chinese".to_string(),
            min_chars: 50,
            max_chars: 100,
            temperature: 0.3,
            timeout_ms: 30_000,
            rate_limit_ms: 1_000,
        }
    }
}

/// Builder for EnricherConfig
#[derive(Debug, Default)]
pub struct EnricherConfigBuilder {
    config: EnricherConfig,
}

impl EnricherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the per-call timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Set the delay in milliseconds between calls
    pub fn rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.config.rate_limit_ms = rate_limit_ms;
        self
    }

    pub fn build(self) -> EnricherConfig {
        self.config
    }
}

impl EnricherConfig {
    pub fn builder() -> EnricherConfigBuilder {
        EnricherConfigBuilder::new()
    }

    /// Get the per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the delay between calls as a Duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

/// Build the summary prompt for a site
pub fn build_prompt(info: &SiteInfo, config: &EnricherConfig) -> String {
    format!(
        "You write entries for a directory of tools that help people build products quickly.\n\
        Write one sentence in {language}, between {min} and {max} characters long, that tells a reader what the website below does and who it is for.\n\
        Keep the tone factual and neutral: no marketing superlatives, no emoji, no quotation marks, and do not repeat the site name at the start.\n\
        Reply with the sentence only.\n\n\
        Name: {name}\n\
        URL: {url}\n\
        Title: {title}\n\
        Description: {description}\n\
        Keywords: {keywords}",
        language = config.language,
        min = config.min_chars,
        max = config.max_chars,
        name = info.name,
        url = info.url,
        title = info.title,
        description = info.description,
        keywords = info.keywords,
    )
}

/// Generates short summaries with an optional completion model
pub struct Enricher<M: CompletionModel> {
    agent: Option<Agent<M>>,
    config: EnricherConfig,
}

impl<M: CompletionModel> Enricher<M> {
    /// Create an enricher; `None` disables every call
    pub fn new(model: Option<M>, config: EnricherConfig) -> Self {
        let agent = model.map(|model| {
            AgentBuilder::new(model)
                .temperature(config.temperature)
                .build()
        });
        Self { agent, config }
    }

    /// An enricher that never calls out
    pub fn disabled() -> Self {
        Self::new(None, EnricherConfig::default())
    }

    /// Whether a completion model is configured
    pub fn is_enabled(&self) -> bool {
        self.agent.is_some()
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// Generate a summary for a site, or an empty string
    ///
    /// No request is made when the enricher is disabled or the page has no
    /// title, description or keywords to summarize.
    #[instrument(skip(self, info), fields(url = %info.url))]
    pub async fn enrich(&self, info: &SiteInfo) -> String {
        let Some(agent) = &self.agent else {
            return String::new();
        };
        if !info.has_tdk() {
            debug!("Nothing to summarize");
            return String::new();
        }

        let prompt = build_prompt(info, &self.config);
        match tokio::time::timeout(self.config.timeout(), agent.prompt(prompt.as_str())).await {
            Ok(Ok(summary)) => {
                let summary = summary.trim().to_string();
                debug!("Generated summary of {} chars", summary.chars().count());
                summary
            }
            Ok(Err(e)) => {
                warn!("Failed to generate summary for {}: {}", info.url, e);
                String::new()
            }
            Err(_) => {
                warn!(
                    "Summary for {} timed out after {:?}",
                    info.url,
                    self.config.timeout()
                );
                String::new()
            }
        }
    }
}
