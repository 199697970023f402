//! Repository loader: resolve a branch head, fetch the repository's text
//! files through the GitHub API, chunk them, embed them, and build the
//! in-memory index.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::github::{GithubClient, TreeEntry};
use crate::index::{chunk_text, Passage, RepoIndex};
use crate::llm::embeddings;
use crate::models::RepoRef;

/// Why a repository index could not be built. Callers can distinguish an
/// empty repository from bad credentials and transient upstream failures;
/// none of the variants is retried anywhere.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed repository identifier: {0:?}")]
    MalformedRepo(String),
    #[error("repository or branch not found")]
    NotFound,
    #[error("source-control authentication failed")]
    Auth,
    #[error("repository has no indexable documents")]
    EmptyRepo,
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Seam between the cache/handlers and the real GitHub-backed loader, so
/// tests can substitute a stub.
#[async_trait]
pub trait RepoLoader: Send + Sync {
    async fn load(&self, repo: &str, branch: &str) -> Result<Arc<RepoIndex>, LoadError>;
}

pub struct GithubLoader {
    github: GithubClient,
    http_client: reqwest::Client,
    llm: LlmConfig,
    max_file_bytes: u64,
}

impl GithubLoader {
    pub fn new(
        github: GithubClient,
        http_client: reqwest::Client,
        llm: LlmConfig,
        max_file_bytes: u64,
    ) -> Self {
        Self {
            github,
            http_client,
            llm,
            max_file_bytes,
        }
    }
}

#[async_trait]
impl RepoLoader for GithubLoader {
    async fn load(&self, repo: &str, branch: &str) -> Result<Arc<RepoIndex>, LoadError> {
        let repo_ref =
            RepoRef::parse(repo).ok_or_else(|| LoadError::MalformedRepo(repo.to_string()))?;

        let commit_sha = self.github.resolve_branch(&repo_ref, branch).await?;
        tracing::info!("Resolved {repo_ref}@{branch} to {commit_sha}");

        let entries = self.github.list_tree(&repo_ref, &commit_sha).await?;
        let indexable: Vec<TreeEntry> = entries
            .into_iter()
            .filter(|e| e.size.unwrap_or(0) <= self.max_file_bytes)
            .filter(|e| is_indexable_path(&e.path))
            .collect();

        // Fetch and chunk. Files that vanished since the tree listing or
        // fail to decode are skipped, not fatal.
        let mut paths = Vec::new();
        let mut texts = Vec::new();
        let mut fetched_files = 0usize;
        for entry in &indexable {
            let Some(content) = self
                .github
                .fetch_file(&repo_ref, &entry.path, &commit_sha)
                .await?
            else {
                continue;
            };
            fetched_files += 1;
            for chunk in chunk_text(&content) {
                paths.push(entry.path.clone());
                texts.push(chunk);
            }
        }

        if texts.is_empty() {
            return Err(LoadError::EmptyRepo);
        }

        let vectors = embeddings::embed_batch(&self.http_client, &self.llm, &texts).await?;
        let passages: Vec<Passage> = paths
            .into_iter()
            .zip(texts)
            .zip(vectors)
            .map(|((path, text), embedding)| Passage {
                path,
                text,
                embedding,
            })
            .collect();

        tracing::info!(
            "Indexed {repo_ref}:{branch} at {commit_sha}: {fetched_files} files, {} passages",
            passages.len()
        );
        Ok(Arc::new(RepoIndex::new(passages)))
    }
}

/// Directories that never contain documentation worth indexing.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    "target",
    "__pycache__",
    "venv",
];

/// Extensions of text files worth indexing.
const INDEXABLE_EXTENSIONS: &[&str] = &[
    "md", "markdown", "rst", "txt", "rs", "py", "js", "jsx", "ts", "tsx", "go", "java", "kt",
    "c", "h", "cpp", "hpp", "cs", "rb", "php", "swift", "scala", "sh", "sql", "html", "css",
    "toml", "yaml", "yml", "json", "xml", "ini", "cfg", "proto",
];

/// Filenames without an extension that are still worth indexing.
const INDEXABLE_FILENAMES: &[&str] = &[
    "readme",
    "license",
    "makefile",
    "dockerfile",
    "changelog",
    "contributing",
];

fn is_indexable_path(path: &str) -> bool {
    let mut components = path.split('/').peekable();
    let mut filename = "";
    while let Some(component) = components.next() {
        if components.peek().is_none() {
            filename = component;
            break;
        }
        if component.starts_with('.') || SKIPPED_DIRS.contains(&component) {
            return false;
        }
    }
    if filename.starts_with('.') {
        return false;
    }

    let lower = filename.to_lowercase();
    match lower.rsplit_once('.') {
        Some((stem, ext)) => {
            INDEXABLE_EXTENSIONS.contains(&ext) || INDEXABLE_FILENAMES.contains(&stem)
        }
        None => INDEXABLE_FILENAMES.contains(&lower.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexable_code_and_docs() {
        assert!(is_indexable_path("src/main.rs"));
        assert!(is_indexable_path("docs/guide.md"));
        assert!(is_indexable_path("README"));
        assert!(is_indexable_path("README.md"));
        assert!(is_indexable_path("Dockerfile"));
        assert!(is_indexable_path("Cargo.toml"));
    }

    #[test]
    fn test_skips_binaries_and_unknown_extensions() {
        assert!(!is_indexable_path("assets/logo.png"));
        assert!(!is_indexable_path("bin/tool.exe"));
        assert!(!is_indexable_path("data.bin"));
    }

    #[test]
    fn test_skips_dependency_and_hidden_directories() {
        assert!(!is_indexable_path("node_modules/pkg/index.js"));
        assert!(!is_indexable_path("target/debug/build.rs"));
        assert!(!is_indexable_path(".github/workflows/ci.yml"));
        assert!(!is_indexable_path("src/.hidden.rs"));
    }
}
