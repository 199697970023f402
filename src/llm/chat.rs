use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ChatMessage;
use crate::config::LlmConfig;

/// Per-completion timeout. Synthesis over retrieved context can be slow on
/// local models; the shared client default is too tight for it.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(180);

/// Run one synchronous (non-streaming) chat completion and return the
/// assistant's message text.
pub async fn complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatMessage>,
) -> Result<String> {
    match config.provider.as_str() {
        "openai" => complete_openai(client, config, messages).await,
        "ollama" => complete_ollama(client, config, messages).await,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    }
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: ChatMessage,
}

async fn complete_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatMessage>,
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let resp = client
        .post(&url)
        .timeout(COMPLETION_TIMEOUT)
        .bearer_auth(&config.api_key)
        .json(&OpenAiChatRequest {
            model: &config.chat_model,
            messages,
            stream: false,
        })
        .send()
        .await
        .context("failed to call chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("chat API returned {status}: {body}");
    }

    let body: OpenAiChatResponse = resp.json().await.context("failed to parse chat response")?;
    let answer = body
        .choices
        .into_iter()
        .next()
        .context("chat API returned no choices")?
        .message
        .content;
    Ok(answer)
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

async fn complete_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatMessage>,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);
    let resp = client
        .post(&url)
        .timeout(COMPLETION_TIMEOUT)
        .json(&OllamaChatRequest {
            model: &config.chat_model,
            messages,
            stream: false,
        })
        .send()
        .await
        .context("failed to call Ollama chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama chat API returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("failed to parse Ollama chat response")?;
    Ok(body.message.content)
}
