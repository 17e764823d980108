use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde::Serialize;
use tracing::debug;

use crate::{error::AppError, infra::db::Db};

use super::{
    data::Repository,
    domain::{TodoId, TodoParams},
    validation::Validator,
};

struct Container {
    repo: Repository,
    validator: Validator,
}
impl Container {
    fn new(db: &Db) -> Arc<Self> {
        Arc::new(Container {
            repo: Repository::new(db),
            validator: Validator,
        })
    }
}
type AppState = Arc<Container>;

pub(crate) const PATH: &str = "/todos";

pub(crate) fn router(db: &Db) -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id", put(update_todo).delete(delete_todo))
        .with_state(Container::new(db))
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value).map_err(AppError::Marshal)?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn decode_params(body: &[u8]) -> Result<TodoParams, AppError> {
    serde_json::from_slice(body).map_err(AppError::Decode)
}

/// An id the route declares but the handler doesn't receive means the routing
/// is wired wrong, which is our fault rather than the client's.
fn id_param(params: &HashMap<String, String>) -> Result<TodoId, AppError> {
    let Some(raw) = params.get("id") else {
        return Err(AppError::MissingPathParam("id"));
    };

    raw.parse()
        .map_err(|source| AppError::InvalidPathParam { param: "id", source })
}

async fn list_todos(State(state): State<AppState>) -> Result<Response, AppError> {
    let todos = state
        .repo
        .list()
        .await
        .map_err(AppError::store("could not get todos from db"))?;

    json_response(StatusCode::OK, &todos)
}

async fn create_todo(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let params = decode_params(&body)?;
    state.validator.validate(&params)?;

    debug!(?params, "creating todo");
    let todo = state
        .repo
        .create(&params.description, params.done)
        .await
        .map_err(AppError::store("could not save todo in database"))?;

    json_response(StatusCode::CREATED, &todo)
}

async fn update_todo(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = id_param(&path)?;
    let params = decode_params(&body)?;
    state.validator.validate(&params)?;

    debug!(%id, ?params, "updating todo");
    let todo = state
        .repo
        .update(id, &params.description, params.done)
        .await
        .map_err(AppError::store("could not update todo in database"))?;

    json_response(StatusCode::OK, &todo)
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let id = id_param(&path)?;

    debug!(%id, "deleting todo");
    state
        .repo
        .delete(id)
        .await
        .map_err(AppError::store("could not delete todo in database"))?;

    Ok(StatusCode::OK.into_response())
}
