//! HTTP routes.
//!
//! `POST /` starts a story, `PUT /` continues one. Every other method or path
//! is acknowledged with `{"success":true}`, and a plain OPTIONS anywhere gets
//! 204 with an `Allow` list.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cyoa_domain::{Story, StoryId, Turn};
use cyoa_shared::{
    Acknowledgement, ContinueStoryRequest, StartStoryRequest, StoryData, StoryEnvelope, TurnData,
    TurnEnvelope,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::app::App;
use crate::use_cases::story::StoryError;

/// Preflight results may be cached for a day.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::OPTIONS,
];

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route(
            "/",
            post(start_story)
                .put(continue_story)
                .options(options)
                .fallback(acknowledge),
        )
        .route("/api/health", get(health).fallback(acknowledge))
        .fallback(acknowledge)
}

/// Routes with state and CORS applied.
pub fn router(app: Arc<App>, allowed_origins: &[String]) -> Router {
    routes().with_state(app).layer(cors_layer(allowed_origins))
}

/// CORS policy: an origin is allowed when it contains any configured substring.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Vec<String> = allowed_origins.to_vec();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| allowed.iter().any(|needle| origin.contains(needle.as_str())))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(CORS_MAX_AGE)
}

async fn health() -> &'static str {
    "OK"
}

/// Everything unrouted is acknowledged, except OPTIONS.
async fn acknowledge(method: Method) -> Response {
    if method == Method::OPTIONS {
        return options().await.into_response();
    }
    Json(Acknowledgement::default()).into_response()
}

/// OPTIONS without CORS preflight headers.
async fn options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::ALLOW, "GET, HEAD, POST, PUT, OPTIONS")],
    )
}

// =============================================================================
// Story
// =============================================================================

async fn start_story(
    State(app): State<Arc<App>>,
    payload: Result<Json<StartStoryRequest>, JsonRejection>,
) -> Result<Json<StoryEnvelope>, ApiError> {
    let Json(request) = payload?;

    let story = app
        .use_cases
        .story
        .start
        .execute(request.prompt)
        .await?;

    Ok(Json(StoryEnvelope::success(story_data(&story))))
}

async fn continue_story(
    State(app): State<Arc<App>>,
    payload: Result<Json<ContinueStoryRequest>, JsonRejection>,
) -> Result<Json<TurnEnvelope>, ApiError> {
    let Json(request) = payload?;

    // An id that cannot name a story is reported like a missing one
    let story_id: StoryId = request.id.parse().map_err(|_| ApiError::NotFound)?;

    let story = app
        .use_cases
        .story
        .continue_story
        .execute(story_id, request.prompt)
        .await?;

    let turn = story
        .last_turn()
        .map(turn_data)
        .ok_or(ApiError::Internal("committed story has no turns"))?;

    Ok(Json(TurnEnvelope::new(story.id().to_uuid(), turn)))
}

fn story_data(story: &Story) -> StoryData {
    StoryData {
        id: story.id().to_uuid(),
        title: story.title.clone(),
        turns: story.turns().iter().map(turn_data).collect(),
        ended: story.is_ended(),
    }
}

fn turn_data(turn: &Turn) -> TurnData {
    TurnData {
        user_input: turn.user_input.clone(),
        narrative: turn.narrative.clone(),
        imagery: turn.imagery.clone(),
        rendered_image: turn.rendered_image.clone(),
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Story(StoryError),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::INTERNAL_SERVER_ERROR, "Story not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Story(e) => {
                match &e {
                    StoryError::StorytellerUnavailable(reason) => {
                        tracing::error!(error = %e, reason = %reason, "Story turn failed");
                    }
                    _ => tracing::error!(error = %e, "Story turn failed"),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    e.public_message().to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, Json(StoryEnvelope::failure(message))).into_response()
    }
}

impl From<StoryError> for ApiError {
    fn from(e: StoryError) -> Self {
        ApiError::Story(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::memory_store::InMemoryStoryRepo;
    use crate::infrastructure::ports::{
        ImageGenError, LlmChoice, LlmResponse, MockImageGenPort, MockLlmPort, StoryRepo,
    };

    const REPLY: &str = r#"{"narrative":"Fog rolls in.","imagery":"foggy harbor"}"#;

    fn working_llm() -> MockLlmPort {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(|_| {
            Ok(LlmResponse {
                choices: vec![LlmChoice::new(REPLY)],
                ..Default::default()
            })
        });
        llm
    }

    fn working_images() -> MockImageGenPort {
        let mut images = MockImageGenPort::new();
        images
            .expect_render()
            .returning(|_| Ok("aW1hZ2U=".to_string()));
        images
    }

    fn test_router(
        repo: Arc<InMemoryStoryRepo>,
        llm: MockLlmPort,
        images: MockImageGenPort,
    ) -> Router {
        let app = Arc::new(App::new(
            repo,
            Arc::new(llm),
            Arc::new(images),
            Arc::new(FixedRandom(0, Uuid::new_v4())),
            0.7,
        ));
        router(app, &["localhost:5173".to_string(), "aicyoa.com".to_string()])
    }

    fn json_request(method: Method, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    async fn seeded_story(repo: &InMemoryStoryRepo) -> Story {
        let mut story = Story::new(StoryId::new());
        story.record_turn(
            "start",
            cyoa_domain::StoryBeat::new("A quiet pier.", "pier at dusk").expect("beat"),
            None,
        );
        repo.save(&story).await.expect("save");
        story
    }

    #[tokio::test]
    async fn post_starts_a_story() {
        let repo = Arc::new(InMemoryStoryRepo::new());
        let response = test_router(repo.clone(), working_llm(), working_images())
            .oneshot(json_request(Method::POST, json!({"prompt": "I arrive by boat"})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["story"]["turns"][0]["userInput"], "I arrive by boat");
        assert_eq!(body["story"]["turns"][0]["narrative"], "Fog rolls in.");
        assert_eq!(body["story"]["turns"][0]["renderedImage"], "aW1hZ2U=");
        assert_eq!(body["story"]["ended"], false);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn post_with_unavailable_storyteller_returns_failure_envelope() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(LlmResponse::default()));

        let response = test_router(
            Arc::new(InMemoryStoryRepo::new()),
            llm,
            MockImageGenPort::new(),
        )
        .oneshot(json_request(Method::POST, json!({"prompt": "hello"})))
        .await
        .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(
            body,
            json!({"success": false, "story": null, "error": "Storyteller is unavailable"})
        );
    }

    #[tokio::test]
    async fn post_with_bad_body_is_bad_request() {
        let response = test_router(
            Arc::new(InMemoryStoryRepo::new()),
            MockLlmPort::new(),
            MockImageGenPort::new(),
        )
        .oneshot(json_request(Method::POST, json!({"text": "wrong field"})))
        .await
        .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn put_returns_only_the_new_turn() {
        let repo = Arc::new(InMemoryStoryRepo::new());
        let story = seeded_story(&repo).await;

        let mut images = MockImageGenPort::new();
        images
            .expect_render()
            .returning(|_| Err(ImageGenError::PollLimitReached { attempts: 3 }));

        let response = test_router(repo.clone(), working_llm(), images)
            .oneshot(json_request(
                Method::PUT,
                json!({"id": story.id().to_string(), "prompt": "walk to the lighthouse"}),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], story.id().to_string());
        assert_eq!(body["turn"]["userInput"], "walk to the lighthouse");
        assert_eq!(body["turn"]["renderedImage"], "");

        let stored = repo.get(story.id()).await.expect("get").expect("stored");
        assert_eq!(stored.turns().len(), 2);
    }

    #[tokio::test]
    async fn put_unknown_or_invalid_id_reports_not_found() {
        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let mut llm = MockLlmPort::new();
            llm.expect_generate().never();

            let response = test_router(
                Arc::new(InMemoryStoryRepo::new()),
                llm,
                MockImageGenPort::new(),
            )
            .oneshot(json_request(Method::PUT, json!({"id": id, "prompt": "hi"})))
            .await
            .expect("response");

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = read_json(response).await;
            assert_eq!(
                body,
                json!({"success": false, "story": null, "error": "Story not found"})
            );
        }
    }

    #[tokio::test]
    async fn other_methods_and_paths_are_acknowledged() {
        for (method, uri) in [
            (Method::GET, "/"),
            (Method::DELETE, "/"),
            (Method::GET, "/anything/else"),
            (Method::PATCH, "/api/stories"),
            (Method::POST, "/api/health"),
        ] {
            let response = test_router(
                Arc::new(InMemoryStoryRepo::new()),
                MockLlmPort::new(),
                MockImageGenPort::new(),
            )
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(read_json(response).await, json!({"success": true}));
        }
    }

    #[tokio::test]
    async fn health_check_responds() {
        let response = test_router(
            Arc::new(InMemoryStoryRepo::new()),
            MockLlmPort::new(),
            MockImageGenPort::new(),
        )
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin_is_answered() {
        let response = test_router(
            Arc::new(InMemoryStoryRepo::new()),
            MockLlmPort::new(),
            MockImageGenPort::new(),
        )
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header(header::ORIGIN, "https://www.aicyoa.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://www.aicyoa.com"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_MAX_AGE),
            Some(&HeaderValue::from_static("86400"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS),
            Some(&HeaderValue::from_static("content-type"))
        );
    }

    #[tokio::test]
    async fn preflight_from_unknown_origin_gets_no_allow_origin() {
        let response = test_router(
            Arc::new(InMemoryStoryRepo::new()),
            MockLlmPort::new(),
            MockImageGenPort::new(),
        )
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header(header::ORIGIN, "https://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn plain_options_lists_allowed_methods() {
        for uri in ["/", "/anything/else", "/api/health"] {
            let response = test_router(
                Arc::new(InMemoryStoryRepo::new()),
                MockLlmPort::new(),
                MockImageGenPort::new(),
            )
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");

            assert_eq!(response.status(), StatusCode::NO_CONTENT, "OPTIONS {uri}");
            assert_eq!(
                response.headers().get(header::ALLOW),
                Some(&HeaderValue::from_static("GET, HEAD, POST, PUT, OPTIONS"))
            );
        }
    }
}
