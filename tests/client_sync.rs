use std::time::Instant;

use reqwest::StatusCode;
use serde_json::json;
use tasklist::{
    build_app,
    client::{render, ClientError, SyncSession, TaskClient},
    config::Config,
};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: &str, text: &str, completed: bool) -> serde_json::Value {
    json!({ "id": id, "text": text, "completed": completed })
}

async fn mock_with_tasks(tasks: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(&server)
        .await;
    server
}

async fn spawn_service() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_app(Config {
        bind_addr: addr,
        ..Config::default()
    });
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind temp port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn client_reports_structured_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/999"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Task not found." })))
        .mount(&server)
        .await;

    let client = TaskClient::new(&server.uri()).expect("client build");
    let error = client
        .set_completed("999", true)
        .await
        .expect_err("unknown id");

    assert!(error.is_not_found());
    match error {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Task not found.");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn client_rejects_malformed_success_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tasks": [] })))
        .mount(&server)
        .await;

    let client = TaskClient::new(&server.uri()).expect("client build");
    let error = client.list().await.expect_err("wrong shape");
    assert!(matches!(error, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let client = TaskClient::new(&closed_port_url()).expect("client build");
    let error = client.list().await.expect_err("nothing listening");
    assert!(matches!(error, ClientError::Transport(_)));
}

#[tokio::test]
async fn load_failure_renders_empty_state_with_banner() {
    let client = TaskClient::new(&closed_port_url()).expect("client build");
    let mut session = SyncSession::new(client);

    session.load().await;

    assert!(session.view().is_empty());
    assert_eq!(
        render(session.view(), Instant::now()),
        [
            "! Could not connect to the server to fetch tasks.",
            "No tasks yet. Add one above!",
        ]
    );
}

#[tokio::test]
async fn blank_input_is_not_sent() {
    let server = mock_with_tasks(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json("x", "x", false)))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;

    assert!(!session.add("   ").await);
    assert!(session.view().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn add_sends_trimmed_text_and_appends_server_record() {
    let server = mock_with_tasks(json!([task_json("1", "first", true)])).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({ "text": "buy milk" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(task_json("srv-1", "buy milk", false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;

    assert!(session.add("  buy milk  ").await);
    let ids: Vec<&str> = session
        .view()
        .items()
        .iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(ids, ["1", "srv-1"]);
    server.verify().await;
}

#[tokio::test]
async fn failed_add_leaves_view_unchanged() {
    let server = mock_with_tasks(json!([task_json("1", "first", false)])).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;
    let before = session.view().items().to_vec();

    assert!(!session.add("second").await);
    assert_eq!(session.view().items(), before.as_slice());
    let banner = session
        .view()
        .visible_banner(Instant::now())
        .map(|banner| banner.message.clone());
    assert_eq!(
        banner.as_deref(),
        Some("Failed to add the new task. Please try again.")
    );
}

#[tokio::test]
async fn toggle_submits_the_inverse_state() {
    let server = mock_with_tasks(json!([task_json("7", "walk dog", true)])).await;
    Mock::given(method("PUT"))
        .and(path("/tasks/7"))
        .and(body_json(json!({ "completed": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("7", "walk dog", false)))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;

    assert!(session.toggle("7").await);
    assert_eq!(session.view().get("7").map(|task| task.completed), Some(false));
    server.verify().await;
}

#[tokio::test]
async fn failed_remove_keeps_the_item() {
    let server = mock_with_tasks(json!([task_json("7", "walk dog", false)])).await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Task not found." })))
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;

    assert!(!session.remove("7").await);
    assert!(session.view().get("7").is_some());
    assert!(session.view().visible_banner(Instant::now()).is_some());
}

#[tokio::test]
async fn ids_outside_the_view_issue_no_requests() {
    let server = mock_with_tasks(json!([])).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = SyncSession::new(TaskClient::new(&server.uri()).expect("client build"));
    session.load().await;

    assert!(!session.toggle("ghost").await);
    assert!(!session.remove("ghost").await);
    server.verify().await;
}

#[tokio::test]
async fn session_round_trips_against_a_live_service() {
    let base_url = spawn_service().await;
    let mut session = SyncSession::new(TaskClient::new(&base_url).expect("client build"));

    session.load().await;
    assert_eq!(session.view().items().len(), 3);

    assert!(session.add("buy milk").await);
    let created = session.view().items()[3].clone();
    assert_eq!(created.text, "buy milk");
    assert!(!created.completed);

    assert!(session.toggle(&created.id).await);
    assert_eq!(
        session.view().get(&created.id).map(|task| task.completed),
        Some(true)
    );

    for id in ["1", "2", "3"] {
        assert!(session.remove(id).await);
    }
    assert!(session.remove(&created.id).await);
    assert!(session.view().is_empty());

    session.load().await;
    assert!(session.view().is_empty());

    let direct = TaskClient::new(&base_url).expect("client build");
    let error = direct.delete("1").await.expect_err("already deleted");
    assert!(error.is_not_found());
}
