use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;

use crate::{
    errors::{AppError, Result},
    models::{
        UpstreamGenerateRequest, UpstreamGenerateResponse, UpstreamSpeechRequest,
        UpstreamSpeechResponse,
    },
};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SPEAKER: &str = "default";

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(AppError::from)
}

/// Client for the speech synthesis service.
#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    base_url: String,
}

impl SpeechClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn synthesize(
        &self,
        text: &str,
        language: Option<&str>,
        speaker_id: Option<&str>,
    ) -> Result<UpstreamSpeechResponse> {
        let request = UpstreamSpeechRequest {
            text,
            language: language.filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LANGUAGE),
            speaker_id: speaker_id.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SPEAKER),
        };

        let response = self
            .client
            .post(format!("{}/api/v1/tts/synthesize", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamStatus(response.status().as_u16()));
        }

        let speech: UpstreamSpeechResponse = response.json().await?;

        // Reject payloads that would hand the caller undecodable audio.
        if let Err(e) = STANDARD.decode(speech.audio_base64.as_bytes()) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "speech service returned invalid base64 audio: {}",
                e
            )));
        }

        tracing::debug!(
            "Synthesized {} chars into {} audio ({:?}s)",
            text.chars().count(),
            speech.format,
            speech.duration_seconds
        );
        Ok(speech)
    }
}

/// Client for the text generation service.
#[derive(Clone)]
pub struct TextGenerationClient {
    client: Client,
    base_url: String,
    max_new_tokens: u32,
}

impl TextGenerationClient {
    pub fn new(base_url: &str, timeout_secs: u64, max_new_tokens: u32) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_new_tokens,
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<UpstreamGenerateResponse> {
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&UpstreamGenerateRequest {
                prompt,
                max_new_tokens: self.max_new_tokens,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamStatus(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}
