//! In-memory repository index: embedded passages with cosine similarity
//! retrieval, plus the line-based chunker that produces the passages.
//!
//! The index lives for the process lifetime and is never refreshed; there is
//! no persistence and no eviction.

/// Target characters per passage.
const CHUNK_CHAR_BUDGET: usize = 2_000;

/// One embedded chunk of a repository file.
#[derive(Debug, Clone)]
pub struct Passage {
    pub path: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A retrieval hit, ranked by cosine similarity.
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub path: String,
    pub text: String,
    pub score: f32,
}

/// Searchable representation of one repository at one commit.
pub struct RepoIndex {
    passages: Vec<Passage>,
}

impl RepoIndex {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    /// Top-`limit` passages by cosine similarity against a query embedding.
    /// Results are relevance-ranked; ties keep insertion order.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<Retrieved> {
        let mut scored: Vec<Retrieved> = self
            .passages
            .iter()
            .map(|p| Retrieved {
                path: p.path.clone(),
                text: p.text.clone(),
                score: cosine_similarity(query_embedding, &p.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Split file content into passages of roughly `CHUNK_CHAR_BUDGET` characters.
/// Prefers breaking at blank lines; a run of lines with no blank line in it is
/// hard-split once it grows past twice the budget.
pub fn chunk_text(content: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buf = String::new();

    for line in content.lines() {
        let at_paragraph_break = line.trim().is_empty();

        if at_paragraph_break && buf.len() >= CHUNK_CHAR_BUDGET {
            flush_chunk(&mut chunks, &mut buf);
            continue;
        }
        if buf.len() + line.len() > CHUNK_CHAR_BUDGET * 2 && !buf.is_empty() {
            flush_chunk(&mut chunks, &mut buf);
        }

        buf.push_str(line);
        buf.push('\n');
    }
    flush_chunk(&mut chunks, &mut buf);

    chunks
}

fn flush_chunk(chunks: &mut Vec<String>, buf: &mut String) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    buf.clear();
}
