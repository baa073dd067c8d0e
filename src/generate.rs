//! AI-generated mood playlists.
//!
//! A [`PlaylistGenerator`] turns a free-text mood prompt into a batch of
//! fictional, non-playable track descriptors. [`GeminiClient`] talks to the
//! Gemini REST API; [`Disabled`] stands in when no API key is configured.

mod gemini;

use thiserror::Error;

use crate::config::GeneratorSettings;
use crate::library::TrackDescriptor;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("playlist generation is unavailable: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unexpected response: {0}")]
    Schema(String),
}

pub trait PlaylistGenerator: Send + Sync {
    /// Produce the whole batch for `prompt`, or fail without a partial result.
    fn generate(&self, prompt: &str) -> Result<Vec<TrackDescriptor>, GenerateError>;
}

/// Generator used when the service cannot be reached at all.
#[derive(Debug, Clone)]
pub struct Disabled {
    reason: String,
}

impl Disabled {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PlaylistGenerator for Disabled {
    fn generate(&self, _prompt: &str) -> Result<Vec<TrackDescriptor>, GenerateError> {
        Err(GenerateError::Unavailable(self.reason.clone()))
    }
}

/// Pick the generator `settings` allow: Gemini when an API key resolves,
/// otherwise [`Disabled`].
pub fn from_settings(settings: &GeneratorSettings) -> Box<dyn PlaylistGenerator> {
    let Some(api_key) = settings.resolve_api_key() else {
        log::warn!(
            "no API key configured (generator.api_key or ${}); mood playlists are disabled",
            settings.api_key_env
        );
        return Box::new(Disabled::new(format!(
            "set generator.api_key or ${}",
            settings.api_key_env
        )));
    };

    match GeminiClient::new(settings, api_key) {
        Ok(client) => Box::new(client),
        Err(e) => {
            log::error!("cannot build HTTP client: {e}");
            Box::new(Disabled::new(e.to_string()))
        }
    }
}
