//! Client for the Gemini generative-language REST API.
//!
//! The `GeminiClient` methods surface typed [`AiError`]s. The free functions at
//! the bottom are what the UI calls: they never fail, degrading to the fixed
//! fallback text or to `None` instead.

use super::models::{ChatMessage, ChatRole, GroundingSource, InlineImage, SearchAnswer};
use crate::config::AiSettings;
use crate::diagnostics::{log_perf, PerfTimer};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use thiserror::Error;

static AI_HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const API_KEY_HEADER: &str = "x-goog-api-key";

pub const SYSTEM_INSTRUCTION: &str = "You are SeikoBot, a helpful assistant for the SeikoYT video platform. You know about movies, TV shows, and can help users navigate the platform. Your tone is friendly and cinematic.";
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting to my circuits right now. Please try again later.";
pub const SEARCH_FALLBACK: &str =
    "Sorry, I couldn't find an answer to that. Please try another question.";

const POSTER_ASPECT_RATIO: &str = "9:16";
const AVATAR_ASPECT_RATIO: &str = "1:1";
const GENERATED_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no Gemini API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("response carried no usable {0}")]
    EmptyResponse(&'static str),
    #[error("could not decode response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn image(image: &InlineImage) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.base64(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn turn(role: ChatRole, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.as_str().to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// Request builders and response readers
// ---------------------------------------------------------------------------

fn system_instruction() -> Content {
    Content {
        role: None,
        parts: vec![Part::text(SYSTEM_INSTRUCTION)],
    }
}

/// Replays prior turns followed by the new user message. The conversation
/// sent upstream must open with a user turn, so leading assistant turns (the
/// local greeting) are dropped.
pub fn chat_request(history: &[ChatMessage], text: &str) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .skip_while(|message| message.role == ChatRole::Model)
        .filter(|message| !message.text.trim().is_empty())
        .map(|message| Content::turn(message.role, vec![Part::text(message.text.clone())]))
        .collect();
    contents.push(Content::turn(ChatRole::User, vec![Part::text(text)]));

    GenerateContentRequest {
        system_instruction: Some(system_instruction()),
        contents,
        generation_config: None,
        tools: Vec::new(),
    }
}

pub fn edit_image_request(image: &InlineImage, instruction: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content::turn(
            ChatRole::User,
            vec![Part::image(image), Part::text(instruction)],
        )],
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
        }),
        tools: Vec::new(),
    }
}

pub fn search_prompt(query: &str) -> String {
    format!(
        "Based on up-to-date information, answer the following question about movies, tv shows, actors, or directors: \"{query}\""
    )
}

pub fn search_request(query: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content::turn(
            ChatRole::User,
            vec![Part::text(search_prompt(query))],
        )],
        generation_config: None,
        tools: vec![Tool {
            google_search: GoogleSearch {},
        }],
    }
}

pub fn poster_prompt(theme: &str) -> String {
    format!("A high-quality, cinematic movie poster for a film with the following theme: {theme}")
}

pub fn avatar_prompt(username: &str) -> String {
    format!(
        "A vibrant, abstract, circular avatar representing a user named \"{username}\". Minimalist, modern, vector style, cinematic lighting."
    )
}

pub fn image_request(prompt: String, aspect_ratio: &str) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance { prompt }],
        parameters: PredictParameters {
            sample_count: 1,
            aspect_ratio: aspect_ratio.to_string(),
            output_mime_type: GENERATED_MIME_TYPE.to_string(),
        },
    }
}

fn first_parts(response: &GenerateContentResponse) -> &[Part] {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or(&[])
}

/// Concatenated text parts of the first candidate.
pub fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let text: String = first_parts(response)
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First inline image part of the first candidate.
pub fn response_image(response: &GenerateContentResponse) -> Option<InlineImage> {
    first_parts(response)
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find_map(|inline| InlineImage::from_base64(&inline.mime_type, &inline.data))
}

/// Web sources cited by the first candidate. Chunks without a web entry are
/// skipped.
pub fn grounding_sources(response: &GenerateContentResponse) -> Vec<GroundingSource> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.grounding_metadata.as_ref())
        .map(|metadata| {
            metadata
                .grounding_chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .filter(|web| !web.uri.trim().is_empty())
                .map(|web| GroundingSource {
                    uri: web.uri.clone(),
                    title: web.title.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn prediction_image(response: &PredictResponse) -> Option<InlineImage> {
    response.predictions.iter().find_map(|prediction| {
        let encoded = prediction.bytes_base64_encoded.as_deref()?;
        let mime_type = prediction.mime_type.as_deref().unwrap_or(GENERATED_MIME_TYPE);
        InlineImage::from_base64(mime_type, encoded)
    })
}

fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.trim().is_empty() {
            return envelope.error.message;
        }
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        format!("{}…", trimmed.chars().take(200).collect::<String>())
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: AiSettings,
}

impl GeminiClient {
    pub fn new(settings: AiSettings) -> Self {
        Self {
            settings: settings.normalized(),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{method}",
            self.settings.api_base,
            urlencoding::encode(model)
        )
    }

    async fn post_json<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R, AiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if !self.settings.has_api_key() {
            return Err(AiError::MissingApiKey);
        }

        let request = AI_HTTP_CLIENT
            .post(self.endpoint(model, method))
            .header(API_KEY_HEADER, self.settings.api_key.as_str())
            .json(body);
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(Duration::from_secs(
            self.settings.request_timeout_secs as u64,
        ));

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        response
            .json::<R>()
            .await
            .map_err(|err| AiError::Decode(err.to_string()))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        self.post_json(model, "generateContent", request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, AiError> {
        self.post_json(&self.settings.image_model, "predict", request)
            .await
    }

    pub async fn chat(&self, history: &[ChatMessage], text: &str) -> Result<String, AiError> {
        let response = self
            .generate_content(&self.settings.chat_model, &chat_request(history, text))
            .await?;
        response_text(&response).ok_or(AiError::EmptyResponse("text"))
    }

    pub async fn edit_image(
        &self,
        image: &InlineImage,
        instruction: &str,
    ) -> Result<InlineImage, AiError> {
        let response = self
            .generate_content(
                &self.settings.image_edit_model,
                &edit_image_request(image, instruction),
            )
            .await?;
        response_image(&response).ok_or(AiError::EmptyResponse("image"))
    }

    pub async fn generate_image(
        &self,
        prompt: String,
        aspect_ratio: &str,
    ) -> Result<InlineImage, AiError> {
        let response = self.predict(&image_request(prompt, aspect_ratio)).await?;
        prediction_image(&response).ok_or(AiError::EmptyResponse("image"))
    }

    pub async fn search(&self, query: &str) -> Result<SearchAnswer, AiError> {
        let response = self
            .generate_content(&self.settings.search_model, &search_request(query))
            .await?;
        let text = response_text(&response).ok_or(AiError::EmptyResponse("text"))?;
        Ok(SearchAnswer {
            text,
            sources: grounding_sources(&response),
        })
    }
}

// ---------------------------------------------------------------------------
// UI-facing operations
// ---------------------------------------------------------------------------

/// Logs once at start-up when no key is configured.
pub fn warn_if_unconfigured(settings: &AiSettings) {
    if !settings.has_api_key() {
        tracing::warn!(
            "Gemini API key not found; set SEIKOYT_GEMINI_API_KEY at build time or add one in AI settings"
        );
    }
}

pub async fn send_chat_message(settings: &AiSettings, history: &[ChatMessage], text: &str) -> String {
    let timer = PerfTimer::start();
    let result = GeminiClient::new(settings.clone()).chat(history, text).await;
    log_perf("gemini.chat", timer, &format!("turns={}", history.len() + 1));
    match result {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!("chat request failed: {err}");
            CHAT_FALLBACK.to_string()
        }
    }
}

pub async fn edit_image(
    settings: &AiSettings,
    image: &InlineImage,
    instruction: &str,
) -> Option<InlineImage> {
    let timer = PerfTimer::start();
    let result = GeminiClient::new(settings.clone())
        .edit_image(image, instruction)
        .await;
    log_perf("gemini.edit_image", timer, &image.mime_type);
    result
        .map_err(|err| tracing::error!("image edit failed: {err}"))
        .ok()
}

/// Movie poster for a free-text theme.
pub async fn generate_image(settings: &AiSettings, theme: &str) -> Option<InlineImage> {
    let timer = PerfTimer::start();
    let result = GeminiClient::new(settings.clone())
        .generate_image(poster_prompt(theme), POSTER_ASPECT_RATIO)
        .await;
    log_perf("gemini.generate_image", timer, "");
    result
        .map_err(|err| tracing::error!("poster generation failed: {err}"))
        .ok()
}

pub async fn generate_profile_picture(settings: &AiSettings, username: &str) -> Option<InlineImage> {
    let timer = PerfTimer::start();
    let result = GeminiClient::new(settings.clone())
        .generate_image(avatar_prompt(username), AVATAR_ASPECT_RATIO)
        .await;
    log_perf("gemini.generate_profile_picture", timer, "");
    result
        .map_err(|err| tracing::error!("avatar generation failed: {err}"))
        .ok()
}

pub async fn search_with_sources(settings: &AiSettings, query: &str) -> SearchAnswer {
    let timer = PerfTimer::start();
    let result = GeminiClient::new(settings.clone()).search(query).await;
    log_perf("gemini.search", timer, query);
    match result {
        Ok(answer) => answer,
        Err(err) => {
            tracing::error!("grounded search failed: {err}");
            SearchAnswer {
                text: SEARCH_FALLBACK.to_string(),
                sources: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keyless() -> AiSettings {
        AiSettings {
            api_key: String::new(),
            ..AiSettings::default()
        }
    }

    #[test]
    fn chat_history_drops_leading_model_turns() {
        let history = vec![
            ChatMessage::greeting(),
            ChatMessage::user("Any heist films?"),
            ChatMessage::model("Try Rififi."),
        ];
        let request = chat_request(&history, "Something newer?");
        let roles: Vec<_> = request
            .contents
            .iter()
            .map(|content| content.role.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(
            request.contents[2].parts[0].text.as_deref(),
            Some("Something newer?")
        );
    }

    #[test]
    fn chat_request_serializes_in_camel_case() {
        let value = serde_json::to_value(chat_request(&[], "hi")).unwrap();
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            json!(SYSTEM_INSTRUCTION)
        );
        assert_eq!(value["contents"][0], json!({"role": "user", "parts": [{"text": "hi"}]}));
        assert!(value.get("tools").is_none());
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn edit_request_sends_image_then_instruction() {
        let image = InlineImage::from_base64("image/png", "AAEC").unwrap();
        let value = serde_json::to_value(edit_image_request(&image, "Make it noir")).unwrap();
        assert_eq!(
            value["contents"][0]["parts"],
            json!([
                {"inlineData": {"mimeType": "image/png", "data": "AAEC"}},
                {"text": "Make it noir"}
            ])
        );
        assert_eq!(value["generationConfig"]["responseModalities"], json!(["IMAGE"]));
    }

    #[test]
    fn search_request_enables_google_search_tool() {
        let value = serde_json::to_value(search_request("Who directed Alien?")).unwrap();
        assert_eq!(value["tools"], json!([{"googleSearch": {}}]));
        assert_eq!(
            value["contents"][0]["parts"][0]["text"],
            json!("Based on up-to-date information, answer the following question about movies, tv shows, actors, or directors: \"Who directed Alien?\"")
        );
    }

    #[test]
    fn poster_request_uses_portrait_jpeg() {
        let value =
            serde_json::to_value(image_request(poster_prompt("a lone astronaut"), POSTER_ASPECT_RATIO))
                .unwrap();
        assert_eq!(
            value,
            json!({
                "instances": [{"prompt": "A high-quality, cinematic movie poster for a film with the following theme: a lone astronaut"}],
                "parameters": {"sampleCount": 1, "aspectRatio": "9:16", "outputMimeType": "image/jpeg"}
            })
        );
    }

    #[test]
    fn grounding_chunks_without_web_entry_are_skipped() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Ridley "}, {"text": "Scott."}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://example.com/alien", "title": "Alien (1979)"}},
                    {"retrievedContext": {"uri": "ignored"}},
                    {"web": {"uri": "https://example.com/scott"}}
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(response_text(&response).as_deref(), Some("Ridley Scott."));
        let sources = grounding_sources(&response);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].display_title(), "Alien (1979)");
        assert_eq!(sources[1].display_title(), "https://example.com/scott");
    }

    #[test]
    fn image_parts_and_predictions_decode() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "AAEC"}}
            ]}}]
        }))
        .unwrap();
        assert_eq!(response_image(&response).unwrap().data, vec![0, 1, 2]);

        let prediction: PredictResponse = serde_json::from_value(json!({
            "predictions": [{"bytesBase64Encoded": "AAEC"}]
        }))
        .unwrap();
        let image = prediction_image(&prediction).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,AAEC");
    }

    #[test]
    fn empty_responses_yield_nothing() {
        let response = GenerateContentResponse::default();
        assert_eq!(response_text(&response), None);
        assert_eq!(response_image(&response), None);
        assert!(grounding_sources(&response).is_empty());
        assert_eq!(prediction_image(&PredictResponse::default()), None);
    }

    #[test]
    fn error_bodies_are_summarized() {
        assert_eq!(
            error_message(r#"{"error":{"code":400,"message":"API key not valid."}}"#),
            "API key not valid."
        );
        assert_eq!(error_message("  upstream timeout "), "upstream timeout");
    }

    #[test]
    fn endpoint_targets_model_method() {
        let client = GeminiClient::new(AiSettings {
            api_base: "https://proxy.local/".into(),
            ..keyless()
        });
        assert_eq!(
            client.endpoint("gemini-2.5-flash", "generateContent"),
            "https://proxy.local/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_degrades_to_fallbacks() {
        let settings = keyless();
        assert!(matches!(
            GeminiClient::new(settings.clone()).chat(&[], "hi").await,
            Err(AiError::MissingApiKey)
        ));
        assert_eq!(send_chat_message(&settings, &[], "hi").await, CHAT_FALLBACK);

        let answer = search_with_sources(&settings, "Best noir?").await;
        assert_eq!(answer.text, SEARCH_FALLBACK);
        assert!(answer.sources.is_empty());

        assert_eq!(generate_image(&settings, "storm").await, None);
        assert_eq!(generate_profile_picture(&settings, "ana").await, None);
    }
}
