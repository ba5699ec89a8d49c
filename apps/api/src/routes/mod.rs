pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::insights::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/insights/operations",
            get(handlers::handle_list_operations),
        )
        // Discovery-class: fall back to static content on failure
        .route(
            "/api/v1/insights/providers",
            post(handlers::handle_search_providers),
        )
        .route(
            "/api/v1/insights/property-risk",
            post(handlers::handle_property_risk),
        )
        .route(
            "/api/v1/insights/market-entities",
            post(handlers::handle_market_entities),
        )
        .route(
            "/api/v1/insights/landing-copy",
            post(handlers::handle_landing_copy),
        )
        // Document and estimate-class: errors reach the caller
        .route(
            "/api/v1/insights/policy-analysis",
            post(handlers::handle_policy_analysis),
        )
        .route(
            "/api/v1/insights/coverage-gaps",
            post(handlers::handle_coverage_gaps),
        )
        .route(
            "/api/v1/insights/premium-estimate",
            post(handlers::handle_premium_estimate),
        )
        .route(
            "/api/v1/insights/legacy-projection",
            post(handlers::handle_legacy_projection),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::gateway::Gateway;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::LlmError;

    fn test_config() -> Config {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: "scripted".to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            llm_timeout: Duration::from_secs(5),
            max_upload_bytes: 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app_with(backend: Arc<ScriptedBackend>) -> Router {
        build_router(AppState {
            gateway: Gateway::new(backend),
            config: test_config(),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_multipart(uri: &str, name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
        let boundary = "XTESTBOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"policy\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(ScriptedBackend::default()));
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "scripted");
    }

    #[tokio::test]
    async fn test_operations_catalog_lists_policies() {
        let app = app_with(Arc::new(ScriptedBackend::default()));
        let request = Request::builder()
            .uri("/api/v1/insights/operations")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        let ops = body.as_array().unwrap();
        assert_eq!(ops.len(), 8);
        assert!(ops.contains(&json!({"operation": "provider_search", "failurePolicy": "fallback"})));
        assert!(ops.contains(&json!({"operation": "policy_analysis", "failurePolicy": "propagate"})));
    }

    #[tokio::test]
    async fn test_provider_search_falls_back_on_upstream_failure() {
        let backend = Arc::new(ScriptedBackend::failing(LlmError::MissingApiKey));
        let (status, body) = send(
            app_with(backend),
            post_json("/api/v1/insights/providers", json!({"location": "90210, USA"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let local: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .filter(|p| p["distance"] != "Online")
            .collect();
        assert!(!local.is_empty());
        assert!(local.iter().all(|p| p["address"] == "Near 90210, USA"));
    }

    #[tokio::test]
    async fn test_blank_location_is_rejected_before_upstream() {
        let backend = Arc::new(ScriptedBackend::default());
        let (status, body) = send(
            app_with(backend.clone()),
            post_json("/api/v1/insights/providers", json!({"location": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_premium_failure_is_bad_gateway() {
        let backend = Arc::new(ScriptedBackend::failing(LlmError::EmptyContent));
        let (status, body) = send(
            app_with(backend),
            post_json(
                "/api/v1/insights/premium-estimate",
                json!({"age": 40, "zipCode": "78701", "homeValue": 350000, "coverageLevel": "basic"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_coverage_gaps_round_trip_camel_case() {
        let backend = Arc::new(ScriptedBackend::replying(
            r#"{"riskScore": 55, "gapCount": 1, "gaps": [{"title": "Flood", "description": "Excluded.", "remedy": "NFIP"}], "debug": true}"#,
        ));
        let (status, body) = send(
            app_with(backend),
            post_json(
                "/api/v1/insights/coverage-gaps",
                json!({"answers": {"Do you have flood insurance?": false}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gapCount"], 1);
        assert_eq!(body["gaps"][0]["remedy"], "NFIP");
        assert!(body.get("debug").is_none());
    }

    #[tokio::test]
    async fn test_legacy_rejects_retirement_before_age() {
        let backend = Arc::new(ScriptedBackend::default());
        let (status, _) = send(
            app_with(backend.clone()),
            post_json(
                "/api/v1/insights/legacy-projection",
                json!({"age": 60, "retirementAge": 55, "currentAssets": 1, "annualContribution": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_policy_upload_is_encoded_and_forwarded() {
        let backend = Arc::new(ScriptedBackend::replying(
            r#"{"currentPolicy": {"carrier": "Acme", "deductible": 1000, "premium": 1500},
                "exclusions": [],
                "recommendation": {"carrier": "Harbor", "premium": 1300, "savings": 200},
                "negotiationScript": "Ask for a loyalty discount."}"#,
        ));
        let (status, body) = send(
            app_with(backend.clone()),
            post_multipart(
                "/api/v1/insights/policy-analysis",
                "file",
                "application/pdf",
                b"%PDF-1.4",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPolicy"]["carrier"], "Acme");

        let sent = backend.requests();
        let document = sent[0].document.as_ref().unwrap();
        assert_eq!(document.mime_type(), "application/pdf");
        assert_eq!(document.data(), "JVBERi0xLjQ=");
    }

    #[tokio::test]
    async fn test_policy_upload_failure_is_explicit_error() {
        let backend = Arc::new(ScriptedBackend::failing(LlmError::Api {
            status: 400,
            message: "unreadable".to_string(),
        }));
        let (status, body) = send(
            app_with(backend),
            post_multipart(
                "/api/v1/insights/policy-analysis",
                "file",
                "image/png",
                b"\x89PNG",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("clearer PDF or image"));
    }

    #[tokio::test]
    async fn test_policy_upload_rejects_unsupported_type() {
        let backend = Arc::new(ScriptedBackend::default());
        let (status, body) = send(
            app_with(backend.clone()),
            post_multipart(
                "/api/v1/insights/policy-analysis",
                "file",
                "text/html",
                b"<html></html>",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_DOCUMENT");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_policy_upload_without_file_part() {
        let backend = Arc::new(ScriptedBackend::default());
        let (status, _) = send(
            app_with(backend),
            post_multipart("/api/v1/insights/policy-analysis", "notes", "text/plain", b"hi"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let backend = Arc::new(ScriptedBackend::default());
        let response = app_with(backend.clone())
            .oneshot(post_multipart(
                "/api/v1/insights/policy-analysis",
                "file",
                "application/pdf",
                &[b'a'; 4096],
            ))
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert!(body["error"]["message"].as_str().unwrap().contains("1024 bytes"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_coverage_gaps_rejects_blank_question() {
        let backend = Arc::new(ScriptedBackend::default());
        let (status, body) = send(
            app_with(backend.clone()),
            post_json(
                "/api/v1/insights/coverage-gaps",
                json!({"answers": {"Do you have flood insurance?": true, "  ": false}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(backend.requests().is_empty());
    }
}
