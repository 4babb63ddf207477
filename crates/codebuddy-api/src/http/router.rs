//! Axum router configuration with middleware.
//!
//! The tutor page lives at `/` and `/s/{id}`; the JSON API is nested under
//! `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/prompt", post(handlers::session::send_prompt))
        .route("/sessions/{id}/export", get(handlers::session::export_session))
        .route("/suggestions", get(handlers::health::list_suggestions));

    let page_routes = Router::new()
        .route("/", get(handlers::page::index))
        .route("/s/{id}", get(handlers::page::show))
        .route("/s/{id}/prompt", post(handlers::page::submit_prompt))
        .route("/s/{id}/suggest/{index}", post(handlers::page::submit_suggestion))
        .route("/s/{id}/export.pdf", get(handlers::page::export_pdf))
        .route("/s/{id}/export.html", get(handlers::page::export_html));

    Router::new()
        .merge(page_routes)
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use codebuddy_core::llm::box_provider::BoxLlmProvider;
    use codebuddy_core::llm::provider::LlmProvider;
    use codebuddy_core::tutor::processor::{GenerationSettings, PromptProcessor};
    use codebuddy_infra::startup::{IssueSeverity, Startup, StartupIssue};
    use codebuddy_types::config::AppConfig;
    use codebuddy_types::llm::{
        CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
    };

    const ANSWER: &str = "### 🧠 Concept Summary\nJoins combine rows.\n\n### 🎯 Quick Quiz\n1. What is a LEFT JOIN?";

    struct MockLlmProvider {
        capabilities: ProviderCapabilities,
        calls: Arc<Mutex<usize>>,
    }

    impl MockLlmProvider {
        fn new(calls: Arc<Mutex<usize>>) -> Self {
            Self {
                capabilities: ProviderCapabilities {
                    structured_output: false,
                    vision: false,
                    max_context_tokens: 1_000_000,
                    max_output_tokens: 8_192,
                },
                calls,
            }
        }
    }

    impl LlmProvider for MockLlmProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            *self.calls.lock().unwrap() += 1;
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("[SEARCH_IMAGE: sql joins diagram]\n{ANSWER}"),
                model: "mock-model".to_string(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    fn test_state_with(provider: bool, issues: Vec<StartupIssue>) -> (AppState, Arc<Mutex<usize>>) {
        test_state_with_config(AppConfig::default(), provider, issues)
    }

    fn test_state_with_config(
        config: AppConfig,
        provider: bool,
        issues: Vec<StartupIssue>,
    ) -> (AppState, Arc<Mutex<usize>>) {
        let calls = Arc::new(Mutex::new(0));
        let provider = provider
            .then(|| Arc::new(BoxLlmProvider::new(MockLlmProvider::new(calls.clone()))));
        let processor = PromptProcessor::new(
            provider,
            None,
            GenerationSettings {
                model: "mock-model".to_string(),
                structured_output: false,
                ..Default::default()
            },
        );
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_parts(
            config,
            Startup { processor, issues },
            dir.path().to_path_buf(),
        )
        .unwrap();
        (state, calls)
    }

    fn test_state() -> (AppState, Arc<Mutex<usize>>) {
        test_state_with(true, vec![])
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let (state, _) = test_state();
        let response = build_router(state).oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["llm_configured"], true);
        assert_eq!(json["images_configured"], false);
    }

    #[tokio::test]
    async fn test_index_creates_session_and_redirects() {
        let (state, _) = test_state();
        let response = build_router(state.clone()).oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);
        let id = target.strip_prefix("/s/").unwrap();
        assert!(state.sessions.get(&id.parse().unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_repeated_index_visits_stay_under_session_cap() {
        let mut config = AppConfig::default();
        config.server.max_sessions = 10;
        let (state, _) = test_state_with_config(config, true, vec![]);
        let app = build_router(state.clone());

        let mut last = String::new();
        for _ in 0..50 {
            let response = app.clone().oneshot(get_req("/")).await.unwrap();
            last = location(&response);
        }

        assert_eq!(state.sessions.len(), 10);
        let response = app.oneshot(get_req(&last)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_page_redirects_home() {
        let (state, _) = test_state();
        let app = build_router(state);

        let unknown = format!("/s/{}", uuid::Uuid::now_v7());
        let response = app.clone().oneshot(get_req(&unknown)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.oneshot(get_req("/s/not-a-uuid")).await.unwrap();
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_fresh_page_shows_suggestions_and_no_export() {
        let (state, _) = test_state();
        let (id, _) = state.sessions.create();
        let response = build_router(state)
            .oneshot(get_req(&format!("/s/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("What are SQL Joins?"));
        assert!(html.contains("Ask a question to generate an answer you can export."));
        assert!(!html.contains("export.pdf"));
    }

    #[tokio::test]
    async fn test_form_prompt_round_trip() {
        let (state, calls) = test_state();
        let (id, _) = state.sessions.create();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(form_post(
                &format!("/s/{id}/prompt"),
                "prompt=What+are+SQL+Joins%3F",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/s/{id}#latest"));
        assert_eq!(*calls.lock().unwrap(), 1);

        let html = body_text(app.oneshot(get_req(&format!("/s/{id}"))).await.unwrap()).await;
        assert!(html.contains("What are SQL Joins?"));
        assert!(html.contains("Concept Summary"));
        assert!(!html.contains("SEARCH_IMAGE"));
        assert!(html.contains("export.pdf"));
        assert!(html.contains("id=\"latest\""));
    }

    #[tokio::test]
    async fn test_page_view_caches_pdf_for_download() {
        let (state, _) = test_state();
        let (id, session) = state.sessions.create();
        session.lock().await.last_answer = Some("### Summary\nA loop repeats.".to_string());
        let app = build_router(state);

        let html = body_text(app.clone().oneshot(get_req(&format!("/s/{id}"))).await.unwrap()).await;
        assert!(html.contains("export.pdf"));
        assert!(!html.contains("could not be converted to PDF"));
        let cached = session.lock().await.cached_export().unwrap();

        let response = app
            .oneshot(get_req(&format!("/s/{id}/export.pdf")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), cached.as_slice());
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_blank_form_prompt_is_ignored() {
        let (state, calls) = test_state();
        let (id, session) = state.sessions.create();
        let response = build_router(state)
            .oneshot(form_post(&format!("/s/{id}/prompt"), "prompt=+++"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/s/{id}"));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(session.lock().await.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_only_before_first_question() {
        let (state, _) = test_state();
        let (id, session) = state.sessions.create();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(form_post(&format!("/s/{id}/suggest/1"), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        {
            let guard = session.lock().await;
            assert_eq!(guard.transcript.turns()[0].content, "What are SQL Joins?");
        }

        let response = app
            .oneshot(form_post(&format!("/s/{id}/suggest/0"), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(session.lock().await.transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_suggestion_index_out_of_range() {
        let (state, _) = test_state();
        let (id, _) = state.sessions.create();
        let response = build_router(state)
            .oneshot(form_post(&format!("/s/{id}/suggest/7"), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_session_prompt_and_export() {
        let (state, _) = test_state();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(Request::builder().method("POST").uri("/api/v1/sessions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let id = json["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(json["data"]["suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["can_export"], false);

        let response = app
            .clone()
            .oneshot(json_post(
                &format!("/api/v1/sessions/{id}/prompt"),
                serde_json::json!({ "message": "What are SQL Joins?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["assistant_turn"]["content"], ANSWER);
        assert_eq!(json["data"]["image_query"], "sql joins diagram");
        assert_eq!(json["data"]["image_lookup_attempted"], false);
        assert!(json["_links"]["export"].is_string());

        let response = app
            .clone()
            .oneshot(get_req(&format!("/api/v1/sessions/{id}")))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["transcript"]["turns"].as_array().unwrap().len(), 2);
        assert!(json["data"]["suggestions"].as_array().unwrap().is_empty());
        assert_eq!(json["data"]["can_export"], true);

        let response = app
            .oneshot(get_req(&format!("/api/v1/sessions/{id}/export")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"CodeBuddy_Answer.pdf\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_api_blank_prompt_is_validation_error() {
        let (state, calls) = test_state();
        let (id, _) = state.sessions.create();
        let response = build_router(state)
            .oneshot(json_post(
                &format!("/api/v1/sessions/{id}/prompt"),
                serde_json::json!({ "message": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_export_without_answer_is_not_found() {
        let (state, _) = test_state();
        let (id, _) = state.sessions.create();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(get_req(&format!("/s/{id}/export.pdf")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "NOTHING_TO_EXPORT");

        let response = app
            .oneshot(get_req(&format!("/api/v1/sessions/{id}/export")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_html_export_download() {
        let (state, _) = test_state();
        let (id, session) = state.sessions.create();
        session.lock().await.last_answer = Some("### Summary\n<b>bold</b>".to_string());

        let response = build_router(state)
            .oneshot(get_req(&format!("/s/{id}/export.html")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"CodeBuddy_Answer.html\""
        );
        let html = body_text(response).await;
        assert!(html.contains("Summary"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, _) = test_state();
        let (id, _) = state.sessions.create();
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.sessions.is_empty());

        let response = app
            .oneshot(get_req(&format!("/api/v1/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_key_shows_banner_and_error_turn() {
        let (state, _) = test_state_with(
            false,
            vec![StartupIssue {
                severity: IssueSeverity::Error,
                message: "GOOGLE_API_KEY not found. Please set it as an environment variable."
                    .to_string(),
            }],
        );
        let (id, session) = state.sessions.create();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(json_post(
                &format!("/api/v1/sessions/{id}/prompt"),
                serde_json::json!({ "message": "What is a stack?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session.lock().await.transcript.turns()[1].is_error());
        assert!(!session.lock().await.can_export());

        let html = body_text(app.oneshot(get_req(&format!("/s/{id}"))).await.unwrap()).await;
        assert!(html.contains("GOOGLE_API_KEY not found"));
    }

    #[tokio::test]
    async fn test_list_suggestions() {
        let (state, _) = test_state();
        let response = build_router(state)
            .oneshot(get_req("/api/v1/suggestions"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"][2], "Explain recursion with an example");
    }
}
