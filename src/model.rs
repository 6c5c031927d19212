//! # Completion Model Module
//!
//! Builds the text completion model used by the enricher, wrapped in a
//! rate limiter so a long site list cannot exhaust the API quota.
//!
//! ## Key Components
//!
//! - `RateLimitedCompletionModel`: a wrapper that adds rate limiting to any completion model
//! - `gemini_from_env`: the Gemini model, or `None` when no API key is configured

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::providers::gemini;
use tracing::debug;

pub mod ratelimited_completion;

#[cfg(test)]
pub mod mock_model;

pub use ratelimited_completion::RateLimitedCompletionModel;

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Model used when none is given on the command line
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.0-flash-lite";

/// Free-tier request quota for the lite models
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;

/// The Gemini completion model behind a rate limiter
pub type GeminiCompletionModel = RateLimitedCompletionModel<gemini::completion::CompletionModel>;

pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

/// Build the Gemini completion model from `GEMINI_API_KEY`
///
/// Returns `None` when the variable is unset or blank; enrichment is then
/// disabled rather than treated as an error.
pub fn gemini_from_env(model: &str) -> Option<GeminiCompletionModel> {
    let api_key = std::env::var(GEMINI_API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty());
    let Some(api_key) = api_key else {
        debug!("{} is not set", GEMINI_API_KEY_VAR);
        return None;
    };

    let gemini_client = gemini::Client::new(&api_key);
    Some(new_gemini(&gemini_client, model, DEFAULT_REQUESTS_PER_MINUTE))
}

/// Wrap a Gemini completion model with a per-minute request quota
pub fn new_gemini(
    gemini_client: &gemini::Client,
    model: &str,
    requests_per_minute: u32,
) -> GeminiCompletionModel {
    let quota = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    let limiter = RateLimiter::direct(Quota::per_minute(quota));
    RateLimitedCompletionModel::new(gemini_client.completion_model(model), limiter)
}
