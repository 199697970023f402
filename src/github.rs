//! Minimal GitHub REST client: branch resolution, recursive tree listing,
//! and raw file download. Only the endpoints the loader needs.

use anyhow::anyhow;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::loader::LoadError;
use crate::models::RepoRef;

const DEFAULT_API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = "repo-qa";

pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    api_root: String,
}

#[derive(Debug, Deserialize)]
struct BranchResponse {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: Option<u64>,
}

impl GithubClient {
    pub fn new(client: reqwest::Client, token: String) -> Self {
        Self::with_api_root(client, token, DEFAULT_API_ROOT.to_string())
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_api_root(client: reqwest::Client, token: String, api_root: String) -> Self {
        Self {
            client,
            token,
            api_root,
        }
    }

    /// Resolve a branch name to its current head commit sha.
    pub async fn resolve_branch(&self, repo: &RepoRef, branch: &str) -> Result<String, LoadError> {
        let url = format!(
            "{}/repos/{}/{}/branches/{}",
            self.api_root, repo.owner, repo.name, branch
        );
        let resp = self.get(&url, "application/vnd.github+json").await?;
        let resp = classify_status(resp, "branch lookup").await?;
        let body: BranchResponse = resp
            .json()
            .await
            .map_err(|e| LoadError::Upstream(anyhow!("bad branch response: {e}")))?;
        Ok(body.commit.sha)
    }

    /// List every blob reachable from a commit, recursively.
    pub async fn list_tree(
        &self,
        repo: &RepoRef,
        commit_sha: &str,
    ) -> Result<Vec<TreeEntry>, LoadError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_root, repo.owner, repo.name, commit_sha
        );
        let resp = self.get(&url, "application/vnd.github+json").await?;
        let resp = classify_status(resp, "tree listing").await?;
        let body: TreeResponse = resp
            .json()
            .await
            .map_err(|e| LoadError::Upstream(anyhow!("bad tree response: {e}")))?;

        if body.truncated {
            tracing::warn!("Tree listing for {repo}@{commit_sha} was truncated by GitHub");
        }

        Ok(body
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .collect())
    }

    /// Download one file as of a commit. Returns `None` if the file vanished
    /// between the tree listing and the fetch.
    pub async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        commit_sha: &str,
    ) -> Result<Option<String>, LoadError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_root, repo.owner, repo.name, path, commit_sha
        );
        let resp = self.get(&url, "application/vnd.github.raw+json").await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = classify_status(resp, "file download").await?;
        let text = resp
            .text()
            .await
            .map_err(|e| LoadError::Upstream(anyhow!("bad file body for {path}: {e}")))?;
        Ok(Some(text))
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, LoadError> {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| LoadError::Upstream(anyhow!("GitHub request failed: {e}")))
    }
}

/// Map a GitHub response status onto the load-error taxonomy:
/// 401/403 → authentication, 404 → not found, other failures → upstream.
async fn classify_status(
    resp: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, LoadError> {
    match resp.status() {
        status if status.is_success() => Ok(resp),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(LoadError::Auth),
        StatusCode::NOT_FOUND => Err(LoadError::NotFound),
        status => {
            let body = resp.text().await.unwrap_or_default();
            Err(LoadError::Upstream(anyhow!(
                "GitHub {what} returned {status}: {body}"
            )))
        }
    }
}
