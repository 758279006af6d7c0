//! End-to-end integration tests for postforge.
//!
//! Most tests run against a throwaway HTTP server on 127.0.0.1 so the whole
//! submit path (encode → POST → status mapping → render) is exercised
//! without network access. The live webhook test is gated behind the
//! `E2E_ENABLED` environment variable and posts real content.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
//!
//! Live webhook:
//!   E2E_ENABLED=1 POSTFORGE_ENDPOINT=https://... cargo test --test e2e live -- --nocapture

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use postforge::{
    messages, CardKind, Client, ClientConfig, FormFields, Platform, PostforgeError, RenderResult,
    SubmissionObserver, UiState, VideoAttachment,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// One canned answer from the local webhook.
#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

impl Reply {
    fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One decoded multipart field.
#[derive(Debug, Clone, PartialEq)]
struct FormField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// A request body as the webhook decoded it.
#[derive(Debug, Clone, PartialEq)]
enum Received {
    Json(Value),
    Multipart(Vec<FormField>),
}

impl Received {
    fn fields(&self) -> &[FormField] {
        match self {
            Received::Multipart(fields) => fields,
            other => panic!("expected multipart, got {other:?}"),
        }
    }
}

/// Shared state of the local webhook: replies still to give, requests seen.
#[derive(Default)]
struct Hook {
    replies: Mutex<VecDeque<Reply>>,
    received: Mutex<Vec<Received>>,
}

impl Hook {
    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn webhook(State(hook): State<Arc<Hook>>, request: Request) -> Response {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let received = if is_multipart {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(m) => m,
            Err(rejection) => return rejection.into_response(),
        };
        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            fields.push(FormField {
                name: field.name().unwrap_or_default().to_string(),
                file_name: field.file_name().map(str::to_string),
                content_type: field.content_type().map(str::to_string),
                bytes: field.bytes().await.unwrap().to_vec(),
            });
        }
        Received::Multipart(fields)
    } else {
        match Json::<Value>::from_request(request, &()).await {
            Ok(Json(body)) => Received::Json(body),
            Err(rejection) => return rejection.into_response(),
        }
    };
    hook.received.lock().unwrap().push(received);

    let reply = hook
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::status(500));
    tokio::time::sleep(reply.delay).await;

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// Serve `replies` in order on an ephemeral port.
async fn serve(replies: Vec<Reply>) -> (String, Arc<Hook>) {
    let hook = Arc::new(Hook {
        replies: Mutex::new(replies.into()),
        received: Mutex::default(),
    });
    let app = Router::new()
        .route("/webhook/content", post(webhook))
        .with_state(hook.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhook/content", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (url, hook)
}

#[derive(Default)]
struct Tracking {
    states: Mutex<Vec<UiState>>,
    sends: Mutex<Vec<String>>,
}

impl SubmissionObserver for Tracking {
    fn on_state(&self, state: &UiState) {
        self.states.lock().unwrap().push(state.clone());
    }

    fn on_sending(&self, label: &str) {
        self.sends.lock().unwrap().push(label.to_string());
    }
}

fn client_for(url: &str, observer: Option<Arc<Tracking>>) -> Client {
    let mut builder = ClientConfig::builder().endpoint(url);
    if let Some(o) = observer {
        builder = builder.observer(o);
    }
    Client::new(builder.build().expect("valid config")).expect("client")
}

fn text_brief() -> FormFields {
    FormFields {
        topic: Some("Spring launch".into()),
        keywords: Some("fashion, spring".into()),
        link: Some("https://shop.example.com".into()),
        platforms: vec![Platform::Instagram, Platform::X],
        video: None,
    }
}

// ── Local server tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_text_submission_sends_json_and_renders_cards() {
    let (url, server) = serve(vec![Reply::json(
        r#"{"posts":{"instagram":{"id":"IG1"},"x":{"text":"Spring is here","id":"X1"}}}"#,
    )])
    .await;
    let tracking = Arc::new(Tracking::default());
    let client = client_for(&url, Some(tracking.clone()));

    let outcome = client.submit(text_brief()).await.expect("submission succeeds");

    let kinds: Vec<_> = outcome.result().cards().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CardKind::Instagram, CardKind::X]);
    assert!(outcome.rendered.diagnostics.is_empty());

    assert_eq!(
        server.received(),
        [Received::Json(json!({
            "topic": "Spring launch",
            "keywords": "fashion, spring",
            "link": "https://shop.example.com",
            "platforms": ["instagram", "twitter"]
        }))]
    );

    assert_eq!(
        tracking.states.lock().unwrap().as_slice(),
        [UiState::Submitting { with_video: false }, UiState::Success]
    );
    assert_eq!(
        tracking.sends.lock().unwrap().as_slice(),
        [messages::BUTTON_SENDING]
    );
}

#[tokio::test]
async fn test_video_submission_is_multipart() {
    let (url, server) = serve(vec![Reply::json(r#"{"youtube_url":"https://youtu.be/abc"}"#)]).await;
    let tracking = Arc::new(Tracking::default());
    let client = client_for(&url, Some(tracking.clone()));

    let fields = FormFields {
        topic: None,
        keywords: Some("bts".into()),
        link: None,
        platforms: vec![Platform::Facebook, Platform::X],
        video: Some(VideoAttachment::new("clip.mp4", "video/mp4", b"fake-mp4".to_vec())),
    };
    let outcome = client.submit(fields).await.expect("submission succeeds");
    assert_eq!(outcome.result().cards()[0].kind, CardKind::Youtube);

    let received = server.received();
    assert_eq!(received.len(), 1);
    let fields = received[0].fields();
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["keywords", "platforms", "platforms", "video"]);

    let platforms: Vec<_> = fields
        .iter()
        .filter(|f| f.name == "platforms")
        .map(|f| String::from_utf8_lossy(&f.bytes).into_owned())
        .collect();
    assert_eq!(platforms, ["facebook", "twitter"]);

    let video = fields.iter().find(|f| f.name == "video").expect("video part");
    assert_eq!(video.file_name.as_deref(), Some("clip.mp4"));
    assert_eq!(video.content_type.as_deref(), Some("video/mp4"));
    assert_eq!(video.bytes, b"fake-mp4");

    assert_eq!(
        tracking.states.lock().unwrap().first(),
        Some(&UiState::Submitting { with_video: true })
    );
}

#[tokio::test]
async fn test_not_found_maps_to_workflow_message() {
    let (url, _server) = serve(vec![Reply::status(404)]).await;
    let tracking = Arc::new(Tracking::default());
    let client = client_for(&url, Some(tracking.clone()));

    let err = client.submit(text_brief()).await.unwrap_err();
    assert!(matches!(err, PostforgeError::Server { status: 404 }));
    assert_eq!(err.user_message(), messages::NOT_FOUND);
    assert_eq!(
        tracking.states.lock().unwrap().last(),
        Some(&UiState::Failed {
            message: messages::NOT_FOUND.to_string()
        })
    );
}

#[tokio::test]
async fn test_payload_too_large_and_other_statuses() {
    let (url, _server) = serve(vec![Reply::status(413), Reply::status(500)]).await;
    let client = client_for(&url, None);

    let err = client.submit(text_brief()).await.unwrap_err();
    assert_eq!(err.user_message(), messages::PAYLOAD_TOO_LARGE);

    let err = client.submit(text_brief()).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to generate content. (Status: 500)");
}

#[tokio::test]
async fn test_empty_and_non_json_bodies_fail() {
    let (url, _server) = serve(vec![Reply::json(""), Reply::json("<html>oops</html>")]).await;
    let client = client_for(&url, None);

    assert!(matches!(
        client.submit(text_brief()).await,
        Err(PostforgeError::EmptyResponse)
    ));
    assert!(matches!(
        client.submit(text_brief()).await,
        Err(PostforgeError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_fallbacks_through_the_client() {
    let (url, _server) = serve(vec![
        Reply::json(r#"[{"text":"Plain answer"}]"#),
        Reply::json(r#"{"status":"queued"}"#),
    ])
    .await;
    let client = client_for(&url, None);

    let outcome = client.submit(text_brief()).await.unwrap();
    assert_eq!(outcome.result(), &RenderResult::PlainText("Plain answer".into()));

    let outcome = client.submit(text_brief()).await.unwrap();
    assert_eq!(
        outcome.result(),
        &RenderResult::RawDump("{\n  \"status\": \"queued\"\n}".into())
    );
}

#[tokio::test]
async fn test_second_concurrent_submission_is_rejected() {
    let (url, server) = serve(vec![
        Reply::json(r#"{"text":"slow"}"#).delayed(Duration::from_millis(300)),
        Reply::json(r#"{"text":"again"}"#),
    ])
    .await;
    let client = client_for(&url, None);

    let (first, second) = tokio::join!(client.submit(text_brief()), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.submit(text_brief()).await
    });
    assert!(first.is_ok());
    assert!(matches!(second, Err(PostforgeError::SubmissionInProgress)));
    assert!(!client.is_busy());

    // Guard released: the next submission goes through.
    let third = client.submit(text_brief()).await.unwrap();
    assert_eq!(third.result(), &RenderResult::PlainText("again".into()));
    assert_eq!(server.received().len(), 2);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhook/content", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(&url, None);
    let err = client.submit(text_brief()).await.unwrap_err();
    assert!(matches!(err, PostforgeError::Transport { .. }));
    assert_eq!(err.user_message(), messages::NETWORK_ERROR);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn test_validation_never_reaches_server() {
    let client = client_for("http://127.0.0.1:9/unused", None);
    let err = client
        .submit(FormFields {
            topic: Some("no platforms".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Please select at least one target platform.");
}

// ── Live webhook (needs network) ─────────────────────────────────────────────

#[tokio::test]
async fn test_live_webhook_text_submission() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
        return;
    }

    let mut builder = ClientConfig::builder().connect_timeout_secs(30);
    if let Ok(endpoint) = std::env::var("POSTFORGE_ENDPOINT") {
        builder = builder.endpoint(endpoint);
    }
    let client = Client::new(builder.build().expect("valid config")).expect("client");

    let outcome = client
        .submit(FormFields {
            topic: Some("postforge e2e smoke test".into()),
            platforms: vec![Platform::X],
            ..Default::default()
        })
        .await
        .expect("live submission should succeed");

    println!(
        "{}",
        postforge::present::to_text(outcome.result(), postforge::Theme::Light, false)
    );
    assert!(
        !outcome.result().cards().is_empty() || outcome.result().is_fallback(),
        "result should render to something"
    );
}
