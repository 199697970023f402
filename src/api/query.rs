use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use crate::engine;
use crate::models::{QueryRequest, QueryResponse};
use crate::state::AppState;

/// POST /query - Answer a natural-language question about a repository.
///
/// Body: `{"repo": "owner/name", "query": "...", "branch": "main"?}`.
/// An absent or malformed body and missing `repo`/`query` both produce the
/// fixed 400 response without touching the cache or loader.
pub async fn query_docs(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Ok(Json(req)) = body else {
        return Err(ApiError::missing_params());
    };
    let (Some(repo), Some(query)) = (req.repo, req.query) else {
        return Err(ApiError::missing_params());
    };
    let branch = req.branch;

    let index = state
        .cache
        .get_or_create(&repo, &branch)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load {repo}:{branch}: {e:#}");
            ApiError::load_failed()
        })?;

    let outcome = engine::answer_query(
        &state.http_client,
        &state.config.llm,
        &index,
        &query,
        state.config.top_k,
    )
    .await
    .map_err(|e| {
        tracing::error!("Query against {repo}:{branch} failed: {e:#}");
        ApiError::query_failed()
    })?;

    Ok(Json(QueryResponse {
        response: outcome.answer,
        sources: outcome.sources,
    }))
}
