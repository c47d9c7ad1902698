use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MAX_SPEECH_TEXT_CHARS: usize = 800;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
    pub speaker_id: Option<String>,
}

/// Payload sent to the text-generation service.
#[derive(Debug, Serialize)]
pub struct UpstreamGenerateRequest<'a> {
    pub prompt: &'a str,
    pub max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamGenerateResponse {
    pub generated_text: String,
    pub model: Option<String>,
}

/// Payload sent to the speech service.
#[derive(Debug, Serialize)]
pub struct UpstreamSpeechRequest<'a> {
    pub text: &'a str,
    pub language: &'a str,
    pub speaker_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSpeechResponse {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    pub audio_base64: String,
    pub duration_seconds: Option<f64>,
}

fn default_format() -> String {
    "wav".to_string()
}

fn default_sample_rate() -> u32 {
    24000
}
