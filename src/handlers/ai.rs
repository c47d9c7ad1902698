use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Json, Response},
};
use serde_json::{json, Map, Value};

use crate::{
    errors::{AppError, Result},
    gateway::{metered, success},
    handlers::{json_body, AppState},
    middleware::CurrentUser,
    models::{GenerateRequest, SpeechRequest, MAX_SPEECH_TEXT_CHARS},
};

pub const GENERATE_ENDPOINT: &str = "/api/ai/generate";
pub const SYNTHESIZE_ENDPOINT: &str = "/api/tts/synthesize";

#[utoipa::path(
    post,
    path = "/api/ai/generate",
    tag = "ai",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text plus quota annotations"),
        (status = 400, description = "Empty prompt"),
        (status = 401, description = "Authentication failed"),
        (status = 502, description = "Text generation service failed")
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response> {
    let request = json_body(payload)?;
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    let textgen = state.textgen.clone();
    let prompt = prompt.to_string();
    let operation = async move {
        let generated = textgen.generate(&prompt).await?;

        let mut body = success("Text generated successfully");
        body.insert("generatedText".to_string(), Value::String(generated.generated_text));
        body.insert("model".to_string(), json!(generated.model));
        Ok::<Map<String, Value>, AppError>(body)
    };

    metered(state, user, GENERATE_ENDPOINT, "POST", operation).await
}

#[utoipa::path(
    post,
    path = "/api/tts/synthesize",
    tag = "ai",
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "Base64 audio plus quota annotations"),
        (status = 400, description = "Missing or overlong text"),
        (status = 401, description = "Authentication failed"),
        (status = 502, description = "Speech service failed")
    )
)]
pub async fn synthesize(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response> {
    let request = json_body(payload)?;
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    if text.chars().count() > MAX_SPEECH_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "Text must be at most {} characters",
            MAX_SPEECH_TEXT_CHARS
        )));
    }

    let speech_client = state.speech.clone();
    let text = text.to_string();
    let operation = async move {
        let speech = speech_client
            .synthesize(&text, request.language.as_deref(), request.speaker_id.as_deref())
            .await?;

        let mut body = success("Speech synthesized successfully");
        body.insert("audioBase64".to_string(), Value::String(speech.audio_base64));
        body.insert("format".to_string(), Value::String(speech.format));
        body.insert("sampleRate".to_string(), json!(speech.sample_rate));
        body.insert("durationSeconds".to_string(), json!(speech.duration_seconds));
        Ok::<Map<String, Value>, AppError>(body)
    };

    metered(state, user, SYNTHESIZE_ENDPOINT, "POST", operation).await
}
