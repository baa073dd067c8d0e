use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::GeneratorSettings;
use crate::library::TrackDescriptor;

use super::{GenerateError, PlaylistGenerator};

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: String,
    track_count: usize,
}

impl GeminiClient {
    pub fn new(settings: &GeneratorSettings, api_key: String) -> Result<Self, GenerateError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: endpoint_url(&settings.endpoint, &settings.model),
            api_key,
            track_count: settings.track_count,
        })
    }
}

impl PlaylistGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Vec<TrackDescriptor>, GenerateError> {
        let body = request_body(prompt, self.track_count);
        log::debug!("requesting {} songs for {prompt:?}", self.track_count);

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_playlist(&text)
    }
}

pub(super) fn endpoint_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

pub(super) fn build_prompt(prompt: &str, count: usize) -> String {
    format!(
        "Generate a playlist of {count} fictional songs for the mood: \"{prompt}\". \
         Provide unique, creative titles, artist names, and durations (MM:SS format). \
         For each song, also provide a URL for a placeholder album art image from \
         picsum.photos with size 200x200."
    )
}

pub(super) fn request_body(prompt: &str, count: usize) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": build_prompt(prompt, count) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "The creative title of the song."
                        },
                        "artist": {
                            "type": "STRING",
                            "description": "The fictional artist's name."
                        },
                        "albumArt": {
                            "type": "STRING",
                            "description": "A URL from picsum.photos for album art (200x200)."
                        },
                        "duration": {
                            "type": "STRING",
                            "description": "The duration of the song in MM:SS format."
                        }
                    },
                    "required": ["title", "artist", "albumArt", "duration"]
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedSong {
    title: Option<String>,
    artist: Option<String>,
    album_art: Option<String>,
    duration: Option<String>,
}

/// A required string field, trimmed; missing and blank are both errors.
fn required(value: Option<String>, field: &str, index: usize) -> Result<String, GenerateError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GenerateError::Schema(format!("song {index} has no {field}")))
}

/// Extract the playlist from a `generateContent` response body.
pub(super) fn parse_playlist(body: &str) -> Result<Vec<TrackDescriptor>, GenerateError> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| GenerateError::Schema("response has no text part".to_string()))?;

    let songs: Vec<GeneratedSong> = serde_json::from_str(text.trim())?;

    songs
        .into_iter()
        .enumerate()
        .map(|(i, song)| {
            Ok(TrackDescriptor {
                title: required(song.title, "title", i)?,
                artist: required(song.artist, "artist", i)?,
                album_art: required(song.album_art, "albumArt", i)?,
                duration: required(song.duration, "duration", i)?,
                file: None,
            })
        })
        .collect()
}
