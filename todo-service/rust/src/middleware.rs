use std::time::Instant;

use axum::{
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
    middleware::Next,
    response,
};
use tracing::{info, info_span, Instrument};

/// Observes the status a response goes out with.
///
/// Headers can only be sent once, so only the first commit counts. Until
/// something is committed the recorder reports the implicit `200 OK`.
#[derive(Debug)]
pub(crate) struct StatusRecorder {
    status: StatusCode,
    committed: bool,
}

impl Default for StatusRecorder {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            committed: false,
        }
    }
}

impl StatusRecorder {
    pub(crate) fn commit(&mut self, status: StatusCode) {
        if self.committed {
            return;
        }

        self.status = status;
        self.committed = true;
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    /// Commits the response's status and hands the response back untouched.
    pub(crate) fn record<B>(&mut self, response: Response<B>) -> Response<B> {
        self.commit(response.status());
        response
    }
}

/// Wraps every request in an `http_request` span and emits one record once
/// the inner handler is done.
pub(crate) async fn log_requests<B>(request: Request<B>, next: Next<B>) -> response::Response {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());

    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        route = matched_path.as_deref(),
    );

    async move {
        let mut recorder = StatusRecorder::default();
        let started = Instant::now();

        let response = recorder.record(next.run(request).await);

        info!(
            elapsed = ?started.elapsed(),
            status = recorder.status().as_u16(),
            "request completed"
        );

        response
    }
    .instrument(span)
    .await
}
