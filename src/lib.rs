//! # repo-qa
//!
//! An HTTP service that answers natural-language questions about a GitHub
//! repository with retrieval-augmented generation: repository files are
//! fetched through the GitHub API, chunked, embedded, and cached in an
//! in-memory index; each query retrieves the most similar passages and asks
//! an LLM to synthesize an answer grounded in them.
//!
//! ## Request flow
//!
//! ```text
//! POST /query → cache get-or-create (per-key lock)
//!                 ├─ hit:  cached index
//!                 └─ miss: GitHub branch → tree → files → chunk → embed
//!             → embed query → top-k cosine retrieval
//!             → LLM completion over retrieved passages
//!             → {response, sources[]}
//! ```
//!
//! ## Module overview
//!
//! - [`config`] - Startup configuration; required secrets abort startup when absent
//! - [`models`] - Wire types and the `owner/name` repository identifier
//! - [`github`] - GitHub REST client: branch resolution, tree listing, file download
//! - [`index`] - In-memory passage index with cosine retrieval, plus the chunker
//! - [`loader`] - `RepoLoader` seam and the GitHub-backed implementation
//! - [`cache`] - Get-or-create index cache keyed by `repo:branch`
//! - [`llm`] - Embedding and chat-completion clients (OpenAI-compatible / Ollama)
//! - [`engine`] - Retrieval-augmented answer synthesis
//! - [`api`] - Axum handlers for `/query` and `/health`
//! - [`state`] - Shared application state

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod github;
pub mod index;
pub mod llm;
pub mod loader;
pub mod models;
pub mod state;
