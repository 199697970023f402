use axum::Json;
use serde_json::{json, Value};

/// GET /health - Liveness probe. No dependency checks: reports healthy
/// regardless of cache or upstream state.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let Json(body) = health_check().await;
        assert_eq!(body, json!({ "status": "healthy" }));
    }
}
