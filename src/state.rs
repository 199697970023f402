use std::sync::Arc;

use crate::cache::IndexCache;
use crate::config::Config;
use crate::github::GithubClient;
use crate::loader::{GithubLoader, RepoLoader};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
    pub cache: Arc<IndexCache>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_http_client()?;
        let github = GithubClient::new(http_client.clone(), config.github_token.clone());
        let loader = GithubLoader::new(
            github,
            http_client.clone(),
            config.llm.clone(),
            config.max_file_bytes,
        );
        Ok(Self {
            config: Arc::new(config),
            http_client,
            cache: Arc::new(IndexCache::new(Box::new(loader))),
        })
    }

    /// Build state around an injected loader. Tests use this to substitute
    /// a stub for the GitHub-backed loader.
    pub fn with_loader(config: Config, loader: Box<dyn RepoLoader>) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            http_client: build_http_client()?,
            cache: Arc::new(IndexCache::new(loader)),
        })
    }
}

fn build_http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(120))
        .build()?)
}
