//! HTTP API tests driven through the router without a socket

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clap::Parser;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::util::ServiceExt;

use event_calendar::{CalendarServer, Config};

fn config() -> Config {
    config_with(&[])
}

fn config_with(extra: &[&str]) -> Config {
    let mut argv = vec![
        "calendar-server",
        "--port",
        "0",
        "--cleanup-interval",
        "1h",
        "--archive-after",
        "30d",
        "--reminder-check-interval",
        "1s",
        "--logger-buffer-size",
        "256",
    ];
    argv.extend_from_slice(extra);
    Config::try_parse_from(argv).unwrap()
}

/// In-memory log destination shared with the test
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn server() -> CalendarServer {
    CalendarServer::with_writer(config(), Box::new(io::sink()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, user: &str, date: &str, text: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/create_event",
            json!({ "user_id": user, "date": date, "event": text }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["result"]["event_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = server();
    let response = server.router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_create_then_query_day() {
    let server = server();
    let app = server.router();

    let (status, body) = send(
        &app,
        post_json(
            "/create_event",
            json!({ "user_id": "U", "date": "2024-01-15", "event": "A" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "Event created successfully");
    let id = body["result"]["event_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/events_for_day?user_id=U&date=2024-01-15")).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["result"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id.as_str());
    assert_eq!(events[0]["date"], "2024-01-15");
    assert_eq!(events[0]["text"], "A");
    assert!(events[0].get("reminder_time").is_none());

    let (_, body) = send(&app, get("/events_for_day?user_id=U&date=2024-01-16")).await;
    assert_eq!(body["result"]["events"], json!([]));
}

#[tokio::test]
async fn test_form_body_accepted() {
    let server = server();
    let app = server.router();

    let (status, body) = send(
        &app,
        post_form(
            "/create_event",
            "user_id=U&date=2024-02-10&event=Team+lunch&reminder_time=2024-02-10T11%3A00%3A00Z",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = send(&app, get("/events_for_month?user_id=U&date=2024-02-01")).await;
    let events = body["result"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["text"], "Team lunch");
    assert_eq!(events[0]["reminder_time"], "2024-02-10T11:00:00Z");
}

#[tokio::test]
async fn test_json_content_type_is_case_insensitive() {
    let server = server();
    let app = server.router();

    let request = Request::builder()
        .method("POST")
        .uri("/create_event")
        .header(header::CONTENT_TYPE, "Application/JSON; Charset=UTF-8")
        .body(Body::from(
            json!({ "user_id": "U", "date": "2024-03-05", "event": "Standup" }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = send(&app, get("/events_for_day?user_id=U&date=2024-03-05")).await;
    assert_eq!(body["result"]["events"][0]["text"], "Standup");
}

#[tokio::test]
async fn test_week_and_active_listing_sorted() {
    let server = server();
    let app = server.router();
    create(&app, "U", "2024-01-20", "Later").await;
    create(&app, "U", "2024-01-15", "Sooner").await;
    create(&app, "U", "2024-03-01", "Outside week").await;

    let (_, body) = send(&app, get("/events_for_week?user_id=U&date=2024-01-15")).await;
    let texts: Vec<&str> = body["result"]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Sooner", "Later"]);

    let (_, body) = send(&app, get("/events?user_id=U")).await;
    assert_eq!(body["result"]["events"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = server();
    let app = server.router();
    let id = create(&app, "U", "2024-01-15", "Draft").await;

    let (status, body) = send(
        &app,
        post_json(
            "/update_event",
            json!({ "user_id": "U", "event_id": id, "date": "2024-01-16", "event": "Final" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "Event updated successfully");

    let (_, body) = send(&app, get("/events_for_day?user_id=U&date=2024-01-16")).await;
    assert_eq!(body["result"]["events"][0]["text"], "Final");

    let (status, _) = send(
        &app,
        post_json("/delete_event", json!({ "user_id": "U", "event_id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_json("/delete_event", json!({ "user_id": "U", "event_id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_client_errors() {
    let server = server();
    let app = server.router();

    let cases = [
        json!({ "user_id": "U", "date": "15/01/2024", "event": "A" }),
        json!({ "user_id": "", "date": "2024-01-15", "event": "A" }),
        json!({ "user_id": "U", "date": "2024-01-15", "event": "   " }),
        json!({ "user_id": "U", "date": "2024-01-15", "event": "A", "reminder_time": "tomorrow" }),
    ];
    for case in cases {
        let (status, body) = send(&app, post_json("/create_event", case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    let (status, body) = send(&app, get("/events_for_day?user_id=U")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id and date are required");

    let request = Request::builder()
        .method("POST")
        .uri("/create_event")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json(
            "/update_event",
            json!({ "user_id": "U", "event_id": "missing", "date": "2024-01-15", "event": "A" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_reminder_enqueued_on_create() {
    let mut server = server();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    server.start(listener).unwrap();
    let app = server.router();
    let stats = server.reminder_stats();

    let reminder = chrono::Utc::now().to_rfc3339();
    let (status, _) = send(
        &app,
        post_json(
            "/create_event",
            json!({
                "user_id": "U",
                "date": "2024-01-15",
                "event": "Call",
                "reminder_time": reminder,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut delivered = false;
    for _ in 0..200 {
        if stats.delivered() == 1 {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(delivered);

    server.shutdown(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_stalled_request_times_out() {
    let capture = Capture::default();
    let mut server = CalendarServer::with_writer(
        config_with(&["--request-timeout", "200ms"]),
        Box::new(capture.clone()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server.start(listener).unwrap();

    // Announce a body and send only part of it
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"POST /create_event HTTP/1.1\r\n\
              Host: localhost\r\n\
              Content-Type: application/json\r\n\
              Content-Length: 100\r\n\r\n\
              {\"user_id\"",
        )
        .await
        .unwrap();

    let mut buf = vec![0u8; 1024];
    let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
        .await
        .unwrap()
        .unwrap();
    let response = String::from_utf8_lossy(&buf[..n]);
    assert!(response.starts_with("HTTP/1.1 408"), "{}", response);
    drop(stream);

    server.shutdown(Duration::from_secs(5)).await.unwrap();
    let lines = capture.lines();
    assert!(
        lines.iter().any(|l| l.contains("HTTP Request")
            && l.contains("status_code=408")
            && l.contains("duration_ms=")),
        "{:?}",
        lines
    );
}
