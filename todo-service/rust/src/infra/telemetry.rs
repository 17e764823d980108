use std::{
    future::Future,
    io,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{instrument::WithSubscriber, Dispatch, Level};
use tracing_subscriber::{filter::LevelFilter, fmt::MakeWriter, EnvFilter};

/// Handle to a structured logging pipeline.
///
/// Nothing is installed globally: whoever owns a `Logger` decides which futures
/// log through it, see [`Logger::scope`]. Child loggers carrying fixed fields are
/// plain `tracing` spans entered while the logger is in scope.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Logs everything at `level` and above to `make_writer`.
    pub fn new<W>(make_writer: W, level: Level) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_max_level(level)
            .with_ansi(false)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Filters with `RUST_LOG` directives, falling back to `default_level`.
    pub fn from_env<W>(make_writer: W, default_level: Level) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(default_level).into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_env_filter(filter)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `future` with this logger as the current dispatcher.
    pub fn scope<F: Future>(&self, future: F) -> tracing::instrument::WithDispatch<F> {
        future.with_subscriber(self.dispatch.clone())
    }

    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Spawns hyper's connection tasks with the caller's dispatcher attached,
/// tokio tasks don't inherit it on their own.
#[derive(Clone)]
pub(crate) struct TracedExecutor {
    dispatch: Dispatch,
}

impl TracedExecutor {
    pub(crate) fn current() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }
}

impl<F> hyper::rt::Executor<F> for TracedExecutor
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    fn execute(&self, fut: F) {
        tokio::spawn(fut.with_subscriber(self.dispatch.clone()));
    }
}

/// In-memory log sink, cloned handles share the same buffer.
#[derive(Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        let buf = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Lines containing `needle`.
    pub fn lines_matching(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
