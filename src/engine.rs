//! Retrieval-augmented query engine: embed the question, retrieve the
//! top-k passages from the index, and synthesize an answer grounded in them.

use anyhow::Result;
use std::fmt::Write;

use crate::config::LlmConfig;
use crate::index::{RepoIndex, Retrieved};
use crate::llm::{chat, embeddings, ChatMessage};

/// Synthesized answer plus the raw text of the passages it was grounded in,
/// in retrieval order.
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<String>,
}

pub async fn answer_query(
    client: &reqwest::Client,
    config: &LlmConfig,
    index: &RepoIndex,
    question: &str,
    top_k: usize,
) -> Result<QueryOutcome> {
    let query_embedding = embeddings::embed_query(client, config, question).await?;
    let hits = index.search(&query_embedding, top_k);

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "{}---\nQuestion: {question}",
            build_context_block(&hits)
        )),
    ];
    let answer = chat::complete(client, config, messages).await?;

    Ok(QueryOutcome {
        answer,
        sources: hits.into_iter().map(|h| h.text).collect(),
    })
}

const SYSTEM_PROMPT: &str = "You are a repository documentation assistant. Each user message \
    includes passages retrieved from a GitHub repository.\n\
    Answer ONLY from the provided passages. If they do not contain the answer, \
    say so and describe what was found instead.\n\
    Reference file paths when relevant.";

fn build_context_block(hits: &[Retrieved]) -> String {
    let mut ctx = String::from("Here are passages from the repository:\n\n");
    if hits.is_empty() {
        ctx.push_str("(No relevant passages were found for this question.)\n");
        return ctx;
    }
    for hit in hits {
        let _ = write!(ctx, "--- {} ---\n{}\n\n", hit.path, hit.text);
    }
    ctx
}
