use serde::{Deserialize, Serialize};
use std::fmt;

/// A GitHub repository identifier, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse `owner/name`. Exactly one `/` with non-empty segments on both
    /// sides; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('/');
        let owner = parts.next()?;
        let name = parts.next()?;
        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Query request. `repo` and `query` are required but modelled as options so
/// the handler can enforce the fixed 400 response itself.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub repo: Option<String>,
    pub query: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

/// Query response: the synthesized answer plus the raw text of each
/// retrieved passage, in retrieval order.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub sources: Vec<String>,
}

/// Error body shared by all failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parses_owner_and_name() {
        let r = RepoRef::parse("octo/hello").unwrap();
        assert_eq!(r.owner, "octo");
        assert_eq!(r.name, "hello");
        assert_eq!(r.to_string(), "octo/hello");
    }

    #[test]
    fn test_repo_ref_rejects_missing_separator() {
        assert!(RepoRef::parse("octohello").is_none());
    }

    #[test]
    fn test_repo_ref_rejects_extra_segments() {
        assert!(RepoRef::parse("octo/hello/world").is_none());
    }

    #[test]
    fn test_repo_ref_rejects_empty_segments() {
        assert!(RepoRef::parse("/hello").is_none());
        assert!(RepoRef::parse("octo/").is_none());
        assert!(RepoRef::parse("/").is_none());
        assert!(RepoRef::parse("").is_none());
    }

    #[test]
    fn test_query_request_branch_defaults_to_main() {
        let req: QueryRequest =
            serde_json::from_str(r#"{"repo":"octo/hello","query":"what is this?"}"#).unwrap();
        assert_eq!(req.branch, "main");
        assert_eq!(req.repo.as_deref(), Some("octo/hello"));
    }

    #[test]
    fn test_query_request_missing_fields_deserialize_as_none() {
        let req: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(req.repo.is_none());
        assert!(req.query.is_none());
    }
}
