mod common;

use common::TestServer;
use hyper::{Method, StatusCode};
use todo_service::Todo;

#[tokio::test]
async fn hello_route() {
    let server = TestServer::start().await;

    let (status, body) = server.send(Method::GET, "/hello/world", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello, world!\n");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn ping_route() {
    let server = TestServer::start().await;

    let (status, body) = server.send(Method::GET, "/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Pong\n");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn list_todos_route() {
    let server = TestServer::start().await;

    let (status, body) = server.send(Method::GET, "/todos", None).await;

    assert_eq!(status, StatusCode::OK);
    let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
    assert!(todos.is_empty());
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn create_todo_route() {
    let server = TestServer::start().await;

    let (status, body) = server
        .send(
            Method::POST,
            "/todos",
            Some(r#"{ "description": "finish this server", "done": true }"#),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let todo: Todo = serde_json::from_str(&body).unwrap();
    assert_eq!(todo.description, "finish this server");
    assert!(todo.done);

    let (_, body) = server.send(Method::GET, "/todos", None).await;
    let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
    assert_eq!(todos, vec![todo]);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn create_todo_route_fail() {
    let server = TestServer::start().await;

    let (status, _) = server.send(Method::POST, "/todos", Some(r#"{ "done": true }"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = server.send(Method::GET, "/todos", None).await;
    assert_eq!(body, "[]");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn update_todo_route() {
    let server = TestServer::start().await;
    let (_, body) = server
        .send(
            Method::POST,
            "/todos",
            Some(r#"{ "description": "finish this server", "done": true }"#),
        )
        .await;
    let todo: Todo = serde_json::from_str(&body).unwrap();

    let (status, body) = server
        .send(
            Method::PUT,
            &format!("/todos/{}", todo.id),
            Some(r#"{ "description": "finish this test", "done": false }"#),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated: Todo = serde_json::from_str(&body).unwrap();
    assert_eq!(updated.id, todo.id);
    assert_eq!(updated.description, "finish this test");
    assert!(!updated.done);

    let (_, body) = server.send(Method::GET, "/todos", None).await;
    let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
    assert_eq!(todos, vec![updated]);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn delete_todo_route() {
    let server = TestServer::start().await;
    let (_, body) = server
        .send(
            Method::POST,
            "/todos",
            Some(r#"{ "description": "finish this server", "done": true }"#),
        )
        .await;
    let todo: Todo = serde_json::from_str(&body).unwrap();
    let path = format!("/todos/{}", todo.id);

    let (status, body) = server.send(Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, _) = server.send(Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = server.send(Method::GET, "/todos", None).await;
    assert_eq!(body, "[]");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn every_logged_request_records_its_status() {
    let server = TestServer::start().await;

    server.send(Method::POST, "/todos", Some(r#"{"description":"a","done":false}"#)).await;
    server.send(Method::POST, "/todos", Some(r#"{"done":true}"#)).await;
    server.send(Method::PUT, "/todos/nope", Some(r#"{"description":"a"}"#)).await;
    server.send(Method::GET, "/todos", None).await;

    let logs = server.logs.clone();
    server.shutdown().await.unwrap();

    let statuses: Vec<_> = logs
        .lines_matching("request completed")
        .iter()
        .map(|line| {
            line.split_whitespace()
                .find_map(|field| field.strip_prefix("status="))
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(statuses, ["201", "400", "400", "200"]);
}

#[tokio::test]
async fn concurrent_creates_get_unique_ids() {
    let server = std::sync::Arc::new(TestServer::start().await);

    let creates = (0..20).map(|i| {
        let server = server.clone();
        tokio::spawn(async move {
            let json = format!(r#"{{"description":"todo {i}","done":false}}"#);
            server.send(Method::POST, "/todos", Some(&json)).await
        })
    });
    for create in creates.collect::<Vec<_>>() {
        let (status, _) = create.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = server.send(Method::GET, "/todos", None).await;
    let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
    let mut ids: Vec<_> = todos.iter().map(|todo| todo.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let server = std::sync::Arc::into_inner(server).unwrap();
    server.shutdown().await.unwrap();
}
