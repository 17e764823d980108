use std::time::Duration;

use hyper::{body, client::HttpConnector, header, Body, Client, Method, Request, StatusCode};
use todo_service::{run, LogBuffer, Logger};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{sleep, Instant},
};
use tracing::Level;

const WAIT_FOR_READY_TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestServer {
    pub base_url: String,
    pub logs: LogBuffer,
    client: Client<HttpConnector>,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

impl TestServer {
    pub async fn start() -> Self {
        let port = free_port();
        let logs = LogBuffer::default();
        let logger = Logger::new(logs.clone(), Level::DEBUG);
        let (cancel, cancelled) = watch::channel(false);

        let handle = tokio::spawn(run(cancelled, logger, move |key: &str| match key {
            "PORT" => Some(port.to_string()),
            "DATABASE_URL" => Some(":memory:".to_string()),
            _ => None,
        }));

        let server = Self {
            base_url: format!("http://127.0.0.1:{port}"),
            logs,
            client: Client::new(),
            cancel,
            handle,
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        let started = Instant::now();

        loop {
            match self.request(Method::GET, "/ping", None).await {
                Ok((StatusCode::OK, _)) => return,
                _ if started.elapsed() >= WAIT_FOR_READY_TIMEOUT => {
                    panic!("timeout reached while waiting for endpoint");
                }
                _ => sleep(Duration::from_millis(25)).await,
            }
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        json: Option<&str>,
    ) -> hyper::Result<(StatusCode, String)> {
        let mut request = Request::builder()
            .method(method)
            .uri(format!("{}{path}", self.base_url));
        if json.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(json.map(|j| Body::from(j.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body()).await?;

        Ok((status, String::from_utf8(bytes.to_vec()).unwrap()))
    }

    pub async fn send(&self, method: Method, path: &str, json: Option<&str>) -> (StatusCode, String) {
        self.request(method, path, json).await.unwrap()
    }

    /// Cancels the server and waits for `run` to return.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.cancel.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(15), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}
