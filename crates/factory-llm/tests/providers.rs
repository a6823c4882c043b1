// ABOUTME: Integration tests driving each chat adapter against in-process stub HTTP servers.
// ABOUTME: Verifies wire formats, headers, envelope parsing, error mapping, and key checks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use factory_llm::{
    CallInput, ChatMessage, ChatOptions, LlmConfig, LlmError, OpenAIApiStyle, ProviderKind,
    VendorConfig, call_json, extract_json, get_provider,
};

/// What the stub saw on its most recent request.
#[derive(Debug, Clone)]
struct Captured {
    uri: String,
    headers: HeaderMap,
    body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    content_type: &'static str,
    reply: String,
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<Captured>>>,
}

struct Stub {
    base: String,
    state: StubState,
}

impl Stub {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    fn last(&self) -> Captured {
        self.state
            .last
            .lock()
            .unwrap()
            .clone()
            .expect("stub received no request")
    }
}

async fn record(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last.lock().unwrap() = Some(Captured {
        uri: uri.to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.reply.clone(),
    )
        .into_response()
}

async fn spawn_stub(status: u16, content_type: &'static str, reply: impl Into<String>) -> Stub {
    let state = StubState {
        status: StatusCode::from_u16(status).unwrap(),
        content_type,
        reply: reply.into(),
        hits: Arc::new(AtomicUsize::new(0)),
        last: Arc::new(Mutex::new(None)),
    };
    let app = Router::new().fallback(record).with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Stub {
        base: format!("http://{}", addr),
        state,
    }
}

fn openai_config(stub: &Stub, key: Option<&str>) -> LlmConfig {
    LlmConfig {
        openai: VendorConfig::new(key, Some(stub.url("/v1/chat/completions").as_str())),
        ..Default::default()
    }
}

fn task() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("persona"),
        ChatMessage::user("give me json"),
    ]
}

#[tokio::test]
async fn default_provider_end_to_end_against_stub() {
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"id": "chatcmpl-1", "choices": [{"message": {"content": "{\"x\":1}"}}]}).to_string(),
    )
    .await;
    let config = openai_config(&stub, Some("test-key"));

    let provider = get_provider(&config).unwrap();
    assert_eq!(provider.provider_name(), "openai");

    let result = provider.chat(&task(), &ChatOptions::default()).await.unwrap();
    assert_eq!(result.content, "{\"x\":1}");
    assert_eq!(result.id, "chatcmpl-1");
    assert_eq!(extract_json(&result.content).unwrap(), json!({"x": 1}));

    let seen = stub.last();
    assert_eq!(seen.uri, "/v1/chat/completions");
    assert_eq!(seen.headers["authorization"], "Bearer test-key");
    assert_eq!(seen.body["model"], "gpt-4o-mini");
    assert_eq!(seen.body["temperature"], 0.2);
    assert_eq!(seen.body["max_tokens"], 800);
    assert_eq!(seen.body["messages"][1]["content"], "give me json");
}

#[tokio::test]
async fn openai_responses_style_sends_flat_input() {
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"id": "resp_1", "output_text": "{}"}).to_string(),
    )
    .await;
    let config = LlmConfig {
        openai: VendorConfig::new(Some("k"), Some(stub.url("/v1/responses").as_str())),
        openai_api_style: OpenAIApiStyle::Responses,
        ..Default::default()
    };

    let result = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default().with_model("gpt-5-mini"))
        .await
        .unwrap();
    assert_eq!(result.content, "{}");

    let body = stub.last().body;
    assert_eq!(body["input"], "persona\n\nUSER: give me json");
    assert_eq!(body["max_output_tokens"], 800);
    assert_eq!(body["model"], "gpt-5-mini");
}

#[tokio::test]
async fn non_success_status_embeds_code_and_body() {
    let stub = spawn_stub(500, "text/plain", "upstream exploded").await;
    let config = openai_config(&stub, Some("k"));

    let err = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap_err();
    match err {
        LlmError::RequestFailed { vendor, status, body } => {
            assert_eq!(vendor, ProviderKind::OpenAI);
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_yields_empty_content() {
    let stub = spawn_stub(200, "text/plain", "hello there").await;
    let config = openai_config(&stub, Some("k"));

    let result = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.content, "");
    assert_eq!(result.id, "");
    assert_eq!(result.raw, Value::String("hello there".to_string()));
}

#[tokio::test]
async fn missing_keys_never_reach_the_network() {
    let stub = spawn_stub(200, "application/json", "{}").await;

    let openai = openai_config(&stub, None);
    let err = get_provider(&openai)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    let anthropic = LlmConfig {
        provider: Some("anthropic".to_string()),
        anthropic: VendorConfig::new(None, Some(stub.base.as_str())),
        ..Default::default()
    };
    let err = get_provider(&anthropic)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    let gemini = LlmConfig {
        provider: Some("google".to_string()),
        gemini: VendorConfig::new(None, Some(stub.base.as_str())),
        ..Default::default()
    };
    assert!(matches!(
        get_provider(&gemini),
        Err(LlmError::KeyMissing { vendor: ProviderKind::Gemini })
    ));

    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn cancelled_token_aborts_before_sending() {
    let stub = spawn_stub(200, "application/json", "{}").await;
    let config = openai_config(&stub, Some("k"));
    let token = CancellationToken::new();
    token.cancel();

    let err = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default().with_signal(token))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Cancelled { vendor: ProviderKind::OpenAI }));
}

/// Sends headers and the first body bytes at once, then stalls before the rest.
async fn spawn_slow_body_stub(stall: Duration) -> String {
    let app = Router::new().fallback(move || async move {
        let body = async_stream::stream! {
            yield Ok::<_, std::io::Error>(Bytes::from_static(b"{\"choices\": [{\"message\": "));
            tokio::time::sleep(stall).await;
            yield Ok(Bytes::from_static(b"{\"content\": \"late\"}}]}"));
        };
        (
            [(header::CONTENT_TYPE, "application/json")],
            Body::from_stream(body),
        )
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/chat/completions", addr)
}

#[tokio::test]
async fn cancelling_while_body_streams_aborts_the_read() {
    let endpoint = spawn_slow_body_stub(Duration::from_secs(3)).await;
    let config = LlmConfig {
        openai: VendorConfig::new(Some("k"), Some(endpoint.as_str())),
        ..Default::default()
    };
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default().with_signal(token))
        .await;

    assert!(
        matches!(
            result,
            Err(LlmError::Cancelled { vendor: ProviderKind::OpenAI }),
        ),
        "expected Cancelled, got {:?}",
        result.map(|r| r.content)
    );
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "read was not interrupted",
    );
}

#[tokio::test]
async fn uncancelled_slow_body_still_completes() {
    let endpoint = spawn_slow_body_stub(Duration::from_millis(200)).await;
    let config = LlmConfig {
        openai: VendorConfig::new(Some("k"), Some(endpoint.as_str())),
        ..Default::default()
    };

    let result = get_provider(&config)
        .unwrap()
        .chat(
            &task(),
            &ChatOptions::default().with_signal(CancellationToken::new()),
        )
        .await
        .unwrap();
    assert_eq!(result.content, "late");
}

#[tokio::test]
async fn anthropic_sends_versioned_headers_and_system_field() {
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"id": "msg_1", "content": [{"type": "text", "text": "{\"ok\":true}"}]}).to_string(),
    )
    .await;
    let config = LlmConfig {
        provider: Some("Anthropic".to_string()),
        anthropic: VendorConfig::new(Some("sk-ant"), Some(stub.url("/v1/messages").as_str())),
        ..Default::default()
    };

    let result = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.id, "msg_1");
    assert_eq!(result.content, "{\"ok\":true}");

    let seen = stub.last();
    assert_eq!(seen.headers["x-api-key"], "sk-ant");
    assert_eq!(seen.headers["anthropic-version"], "2023-06-01");
    assert_eq!(seen.body["system"], "persona");
    assert_eq!(seen.body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn anthropic_whitespace_content_is_returned_verbatim() {
    let stub = spawn_stub(
        200,
        "application/json; charset=utf-8",
        json!({"content": [{"type": "text", "text": "   "}]}).to_string(),
    )
    .await;
    let config = LlmConfig {
        provider: Some("anthropic".to_string()),
        anthropic: VendorConfig::new(Some("sk-ant"), Some(stub.base.as_str())),
        ..Default::default()
    };

    let result = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.content, "   ");
    assert_eq!(result.id, "");
}

#[tokio::test]
async fn gemini_streams_and_accumulates_chunks() {
    let sse = [
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "{\"plan"}]}}]}),
        json!({"candidates": [{"content": {"role": "model", "parts": []}}]}),
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "_id\":\"pl-9\"}"}]},
                "finishReason": "STOP"
            }],
            "responseId": "r-1"
        }),
    ]
    .iter()
    .map(|chunk| format!("data: {}\r\n\r\n", chunk))
    .collect::<String>();
    let stub = spawn_stub(200, "text/event-stream", sse).await;

    let config = LlmConfig {
        provider: Some("gemini".to_string()),
        gemini: VendorConfig::new(Some("g-key"), Some(stub.base.as_str())),
        ..Default::default()
    };
    let provider = get_provider(&config).unwrap();
    assert_eq!(provider.provider_name(), "gemini");

    let result = provider
        .chat(
            &task(),
            &ChatOptions::default().with_model("gemini-1.5-pro"),
        )
        .await
        .unwrap();
    assert_eq!(result.content, "{\"plan_id\":\"pl-9\"}");
    assert_eq!(result.id, "r-1");
    assert_eq!(result.raw.as_array().unwrap().len(), 3);

    let seen = stub.last();
    assert_eq!(
        seen.uri,
        "/v1beta/models/gemini-1.5-pro:streamGenerateContent?alt=sse"
    );
    assert_eq!(seen.headers["x-goog-api-key"], "g-key");
    assert_eq!(seen.body["contents"][0]["parts"][0]["text"], "persona");
    assert_eq!(seen.body["contents"][1]["parts"][0]["text"], "give me json");
}

#[tokio::test]
async fn gemini_error_status_is_request_failed() {
    let stub = spawn_stub(403, "application/json", r#"{"error":{"message":"denied"}}"#).await;
    let config = LlmConfig {
        provider: Some("gemini".to_string()),
        gemini: VendorConfig::new(Some("g-key"), Some(stub.base.as_str())),
        ..Default::default()
    };

    let err = get_provider(&config)
        .unwrap()
        .chat(&task(), &ChatOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::RequestFailed { status: 403, .. }));
    assert!(err.to_string().contains("denied"));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Diff {
    summary: String,
    changes: Vec<String>,
}

#[tokio::test]
async fn call_json_decodes_prose_wrapped_output() {
    let content =
        "Sure! Here it is:\n```json\n{\"summary\":\"one gate\",\"changes\":[\"insert gate\"]}\n```";
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"choices": [{"message": {"content": content}}]}).to_string(),
    )
    .await;
    let config = openai_config(&stub, Some("k"));

    let diff: Diff = call_json(&config, CallInput::new("simulate")).await.unwrap();
    assert_eq!(diff.summary, "one gate");
    assert_eq!(diff.changes, vec!["insert gate".to_string()]);

    let seen = stub.last();
    assert_eq!(seen.body["model"], "gpt-5");
    let messages = seen.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages[1]["content"].as_str().unwrap().contains("<env>"));
    assert_eq!(messages[2]["content"], "simulate");
}

#[tokio::test]
async fn call_json_reports_unextractable_output() {
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"choices": [{"message": {"content": "I cannot help with that."}}]}).to_string(),
    )
    .await;
    let config = openai_config(&stub, Some("k"));

    let err = call_json::<Value>(&config, CallInput::new("plan"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::JsonExtractionFailed));
}

#[tokio::test]
async fn call_json_reports_shape_mismatch() {
    let stub = spawn_stub(
        200,
        "application/json",
        json!({"choices": [{"message": {"content": "{\"unexpected\": true}"}}]}).to_string(),
    )
    .await;
    let config = openai_config(&stub, Some("k"));

    let err = call_json::<Diff>(&config, CallInput::new("simulate"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Decode(_)));
}

#[tokio::test]
#[cfg(feature = "live-test")]
async fn live_providers_answer_a_trivial_prompt() {
    let config = LlmConfig::from_env();
    for kind in ProviderKind::all() {
        if !config.vendor(kind).has_api_key() {
            continue;
        }
        let provider = factory_llm::provider_for(kind, &config).unwrap();
        let result = provider
            .chat(
                &[ChatMessage::user("Reply with the single word: pong")],
                &ChatOptions::default().with_max_tokens(16),
            )
            .await;
        assert!(
            result.is_ok(),
            "{} live call failed: {:?}",
            kind,
            result.err(),
        );
    }
}
