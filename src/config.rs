use thiserror::Error;

/// Environment variables that must be present before the server starts.
const REQUIRED_VARS: &[&str] = &["GITHUB_TOKEN", "LLM_API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),
}

/// Service configuration, built once at startup and passed by reference.
/// Business logic never reads the process environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// GitHub personal access token used for all source-control API calls
    pub github_token: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Number of passages retrieved per query
    pub top_k: usize,
    /// Files larger than this are skipped during indexing
    pub max_file_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for answer synthesis
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key sent as a bearer token
    pub api_key: String,
}

impl Config {
    /// Read configuration from the process environment. Fails before the
    /// server binds its port if any required secret is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Tests use this
    /// with a map instead of mutating the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|var| lookup(var).map_or(true, |v| v.is_empty()))
            .map(|var| var.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let llm = LlmConfig {
            provider: lookup("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            chat_model: lookup("LLM_CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            embedding_model: lookup("LLM_EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            api_key: lookup("LLM_API_KEY").unwrap_or_default(),
        };

        Ok(Self {
            bind_addr: lookup("REPO_QA_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            github_token: lookup("GITHUB_TOKEN").unwrap_or_default(),
            llm,
            top_k: lookup("REPO_QA_TOP_K")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            max_file_bytes: lookup("REPO_QA_MAX_FILE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_048_576),
        })
    }
}
