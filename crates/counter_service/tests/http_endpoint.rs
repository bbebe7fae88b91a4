use std::net::SocketAddr;
use std::sync::Arc;

use counter_service::{
    router, serve, CountResponse, ErrorBody, MessageCounter, ServiceSettings, MESSAGE_PATH,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    counter: Arc<MessageCounter>,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(settings: ServiceSettings) -> Self {
        counter_logging::initialize_for_tests();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let counter = Arc::new(MessageCounter::new());
        let app = router(counter.clone(), &settings);
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(serve(listener, app, async move {
            let _ = rx.await;
        }));
        Self {
            addr,
            counter,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn post_json(&self, body: &str) -> (StatusCode, Vec<u8>) {
        self.post(body, Some("application/json")).await
    }

    async fn post(&self, body: &str, content_type: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = self.client.post(self.url(MESSAGE_PATH)).body(body.to_string());
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        let bytes = response.bytes().await.unwrap().to_vec();
        (status, bytes)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn count_of(bytes: &[u8]) -> u64 {
    serde_json::from_slice::<CountResponse>(bytes)
        .expect("count body")
        .count
}

fn error_of(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(bytes)
        .expect("error body")
        .error
}

#[tokio::test]
async fn post_message_returns_running_count() {
    let server = TestServer::start(ServiceSettings::default()).await;

    let (status, body) = server
        .post_json(r#"{"id": 0, "message": "This is a test"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_of(&body), 4);

    let (status, body) = server
        .post_json(r#"{"id": 1, "message": "Testing again"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_of(&body), 6);

    let (status, body) = server
        .post_json(r#"{"id": 1, "message": "Different words this time"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_of(&body), 6);
}

#[tokio::test]
async fn response_body_is_exact_json() {
    let server = TestServer::start(ServiceSettings::default()).await;
    let (_, body) = server.post_json(r#"{"id": "x", "message": "a b c"}"#).await;
    assert_eq!(String::from_utf8(body).unwrap(), r#"{"count":3}"#);
}

#[tokio::test]
async fn malformed_and_invalid_bodies_are_bad_requests() {
    let server = TestServer::start(ServiceSettings::default()).await;

    let (status, body) = server.post_json("{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "Failed to parse JSON data. Check data format."
    );

    let (status, body) = server
        .post_json(r#"{"id": 0, "message": "test", "extra": 0}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_of(&body).starts_with("Expected JSON data containing two fields: id, message"));

    assert_eq!(server.counter.total(), Ok(0));
}

#[tokio::test]
async fn non_json_content_type_is_rejected_before_parsing() {
    let server = TestServer::start(ServiceSettings::default()).await;
    let valid = r#"{"id": 0, "message": "one two"}"#;

    let (status, body) = server.post(valid, Some("text/plain")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Invalid content type. Expected JSON data.");

    let (status, _) = server.post(valid, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.counter.total(), Ok(0));

    let (status, body) = server
        .post(valid, Some("application/json; charset=utf-8"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_of(&body), 2);
}

#[tokio::test]
async fn content_type_check_can_be_disabled() {
    let settings = ServiceSettings {
        require_json_content_type: false,
        ..ServiceSettings::default()
    };
    let server = TestServer::start(settings).await;

    let (status, body) = server
        .post(r#"{"id": 0, "message": "one two"}"#, Some("text/plain"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_of(&body), 2);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let settings = ServiceSettings {
        max_body_bytes: 64,
        ..ServiceSettings::default()
    };
    let server = TestServer::start(settings).await;
    let message = "word ".repeat(100);
    let body = format!(r#"{{"id": 0, "message": "{message}"}}"#);

    let (status, _) = server.post_json(&body).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(server.counter.total(), Ok(0));
}

#[tokio::test]
async fn only_post_message_is_routed() {
    let server = TestServer::start(ServiceSettings::default()).await;

    let response = server.client.get(server.url(MESSAGE_PATH)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = server
        .client
        .post(server.url("/messages"))
        .header("content-type", "application/json")
        .body(r#"{"id": 0, "message": "x"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_with_same_id_count_once() {
    let server = Arc::new(TestServer::start(ServiceSettings::default()).await);

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                server
                    .post_json(r#"{"id": 42, "message": "five little words right here"}"#)
                    .await
            })
        })
        .collect();

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count_of(&body), 5);
    }
    assert_eq!(server.counter.total(), Ok(5));
}
