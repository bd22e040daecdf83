//! Gemini generation adapter.
//!
//! Calls `models/{model}:streamGenerateContent?alt=sse` straight from the
//! browser via gloo-net and reads the response body incrementally through
//! the Streams API, so fragments reach the UI as soon as they arrive.

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use serde::Deserialize;
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use orbit_core::ports::*;
use orbit_types::{config::LlmConfig, OrbitError, Result};

use super::sse::SseDecoder;

pub struct GeminiProvider {
    config: LlmConfig,
}

impl GeminiProvider {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url(),
            model
        )
    }
}

#[async_trait(?Send)]
impl LlmPort for GeminiProvider {
    fn stream_generate(
        &self,
        req: GenerateRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>> {
        let url = self.stream_url(&req.model);
        let api_key = self.config.api_key.clone();
        let body = build_request_body(&req);

        let opened = async move { open_stream(&url, &api_key, &body).await };
        Box::pin(stream::once(opened).flat_map(|opened| match opened {
            Ok(reader) => body_events(reader).left_stream(),
            Err(e) => stream::iter(vec![LlmStreamEvent::Error(e.to_string())]).right_stream(),
        }))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1beta/models?pageSize=200", self.config.base_url());

        let response = Request::get(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| OrbitError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OrbitError::Llm(describe_http_error(status, &text)));
        }

        let data: ModelList = response
            .json()
            .await
            .map_err(|e| OrbitError::Llm(e.to_string()))?;

        Ok(data.generation_models())
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

// ─── Transport ───────────────────────────────────────────────

async fn open_stream(url: &str, api_key: &str, body: &Value) -> Result<ReadableStreamDefaultReader> {
    if api_key.trim().is_empty() {
        return Err(OrbitError::Config(
            "No API key configured. Add one in Settings.".to_string(),
        ));
    }

    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(body)
        .map_err(|e| OrbitError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| OrbitError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(OrbitError::Llm(describe_http_error(status, &text)));
    }

    let body = response
        .body()
        .ok_or_else(|| OrbitError::Llm("Response has no body".to_string()))?;
    body.get_reader()
        .dyn_into::<ReadableStreamDefaultReader>()
        .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))
}

/// Next chunk of the body, `None` once the stream is done.
async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| OrbitError::Network(format!("{:?}", e)))?;

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }

    let value = Reflect::get(&result, &JsValue::from_str("value"))
        .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}

struct BodyState {
    reader: ReadableStreamDefaultReader,
    decoder: SseDecoder,
    queued: VecDeque<LlmStreamEvent>,
    finished: bool,
}

impl BodyState {
    fn queue_payloads(&mut self, payloads: Vec<String>) {
        for payload in payloads {
            if self.finished {
                return;
            }
            match parse_stream_chunk(&payload) {
                Ok(text) => self.queued.push_back(LlmStreamEvent::Delta(text)),
                Err(e) => {
                    self.queued.push_back(LlmStreamEvent::Error(e.to_string()));
                    self.finished = true;
                }
            }
        }
    }
}

fn body_events(reader: ReadableStreamDefaultReader) -> impl Stream<Item = LlmStreamEvent> {
    let state = BodyState {
        reader,
        decoder: SseDecoder::new(),
        queued: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.queued.pop_front() {
                return Some((event, state));
            }
            if state.finished {
                return None;
            }
            match read_chunk(&state.reader).await {
                Ok(Some(bytes)) => {
                    let payloads = state.decoder.push(&bytes);
                    state.queue_payloads(payloads);
                }
                Ok(None) => {
                    let payloads = state.decoder.finish();
                    state.queue_payloads(payloads);
                    if !state.finished {
                        state.queued.push_back(LlmStreamEvent::Done);
                        state.finished = true;
                    }
                }
                Err(e) => {
                    state.queued.push_back(LlmStreamEvent::Error(e.to_string()));
                    state.finished = true;
                }
            }
        }
    })
}

// ─── Wire format ─────────────────────────────────────────────

/// JSON body for `generateContent`/`streamGenerateContent`.
///
/// An empty text part is dropped when the turn also carries an image; the
/// API rejects empty text parts next to inline data.
pub fn build_request_body(req: &GenerateRequest) -> Value {
    let contents: Vec<Value> = req.contents.iter().map(turn_to_json).collect();

    json!({
        "contents": contents,
        "systemInstruction": {
            "parts": [{ "text": req.system_instruction }],
        },
        "generationConfig": {
            "temperature": req.temperature,
            "maxOutputTokens": req.max_output_tokens,
        },
    })
}

fn turn_to_json(turn: &Turn) -> Value {
    let has_image = turn.parts.iter().any(|p| matches!(p, Part::InlineImage(_)));
    let parts: Vec<Value> = turn
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::InlineImage(image) => Some(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            })),
            Part::Text(text) if text.is_empty() && has_image => None,
            Part::Text(text) => Some(json!({ "text": text })),
        })
        .collect();

    json!({
        "role": turn.role.as_str(),
        "parts": parts,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    prompt_feedback: Option<ApiPromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: Option<ApiContent>,
}

#[derive(Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Deserialize)]
struct ApiPart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

impl ApiError {
    fn summary(&self) -> String {
        match &self.status {
            Some(status) if !self.message.is_empty() => format!("{}: {}", status, self.message),
            Some(status) => status.clone(),
            None => self.message.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl ModelList {
    fn generation_models(self) -> Vec<String> {
        self.models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect()
    }
}

/// Text fragment carried by one SSE payload.
///
/// Thought parts are skipped. A payload without candidates yields an empty
/// fragment; an `error` object fails the stream.
pub fn parse_stream_chunk(payload: &str) -> Result<String> {
    if payload.trim().is_empty() {
        return Ok(String::new());
    }
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| OrbitError::Llm(format!("Malformed stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(OrbitError::Llm(error.summary()));
    }
    if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
        log::warn!("Prompt blocked upstream: {}", reason);
    }

    let text = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

/// `HTTP <status>: <message>`, using the API's error message when the body has one.
pub fn describe_http_error(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: ApiError,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => format!("HTTP {}: {}", status, envelope.error.summary()),
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}
