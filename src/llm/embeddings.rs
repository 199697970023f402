use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Character cap per embedded text. Keeps dense content (minified JS, JSON
/// blobs) under typical embedding-model context lengths.
const EMBED_CHAR_CAP: usize = 4_000;

/// Texts per embedding request.
const EMBED_BATCH_SIZE: usize = 48;

/// Embed a batch of texts with the configured provider. The result is
/// parallel to `texts`.
pub async fn embed_batch(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let capped: Vec<&str> = texts.iter().map(|t| cap_chars(t)).collect();

    let mut vectors = Vec::with_capacity(texts.len());
    for batch in capped.chunks(EMBED_BATCH_SIZE) {
        let mut part = match config.provider.as_str() {
            "openai" => embed_openai(client, config, batch).await?,
            "ollama" => embed_ollama(client, config, batch).await?,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };
        vectors.append(&mut part);
    }
    Ok(vectors)
}

/// Embed one query string.
pub async fn embed_query(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>> {
    let texts = [text.to_string()];
    embed_batch(client, config, &texts)
        .await?
        .into_iter()
        .next()
        .context("embedding API returned no vector")
}

/// Truncate to `EMBED_CHAR_CAP` bytes without splitting a UTF-8 character.
fn cap_chars(text: &str) -> &str {
    if text.len() <= EMBED_CHAR_CAP {
        return text;
    }
    let mut end = EMBED_CHAR_CAP;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OpenAiEmbeddingsResponse {
    data: Vec<OpenAiEmbeddingRow>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingRow {
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let resp = client
        .post(&url)
        .bearer_auth(&config.api_key)
        .json(&OpenAiEmbeddingsRequest {
            model: &config.embedding_model,
            input: texts,
        })
        .send()
        .await
        .context("failed to call embeddings API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("embeddings API returned {status}: {body}");
    }

    let body: OpenAiEmbeddingsResponse = resp
        .json()
        .await
        .context("failed to parse embeddings response")?;
    Ok(body.data.into_iter().map(|row| row.embedding).collect())
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    /// Silently truncate over-length inputs instead of erroring.
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbeddingsResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url);
    let resp = client
        .post(&url)
        .json(&OllamaEmbeddingsRequest {
            model: &config.embedding_model,
            input: texts,
            truncate: true,
        })
        .send()
        .await
        .context("failed to call Ollama embed API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama embed API returned {status}: {body}");
    }

    let body: OllamaEmbeddingsResponse = resp
        .json()
        .await
        .context("failed to parse Ollama embed response")?;
    Ok(body.embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_short_text_unchanged() {
        assert_eq!(cap_chars("hello"), "hello");
    }

    #[test]
    fn test_cap_truncates_long_text() {
        let long = "x".repeat(EMBED_CHAR_CAP + 500);
        assert_eq!(cap_chars(&long).len(), EMBED_CHAR_CAP);
    }

    #[test]
    fn test_cap_respects_char_boundaries() {
        // Multi-byte characters straddling the cap must not be split.
        let long = "é".repeat(EMBED_CHAR_CAP);
        let capped = cap_chars(&long);
        assert!(capped.len() <= EMBED_CHAR_CAP);
        assert!(capped.is_char_boundary(capped.len()));
    }
}
