mod error;
mod health;
mod infra;
mod middleware;
mod routes;
mod server;
mod todos;

pub use infra::telemetry::{LogBuffer, Logger};
pub use server::{run, SHUTDOWN_TIMEOUT};
pub use todos::domain::{Todo, TodoId};
