use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::{
    config::Config,
    store::{InMemoryTaskStore, StoreError},
    types::{CompletionUpdate, ErrorBody, NewTask, Task, ValidationError},
};

pub const TASK_NOT_FOUND: &str = "Task not found.";

#[derive(Clone)]
pub struct AppState {
    config: Config,
    store: InMemoryTaskStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, store: InMemoryTaskStore) -> Self {
        Self { config, store }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: String,
    tasks: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config.service_name.clone(),
        tasks: state.store.len().await,
    })
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let tasks = state.store.list().await;
    debug!(count = tasks.len(), "listing tasks");
    Json(tasks)
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let new_task = NewTask::from_json(&json_or_empty(body))?;
    let task = state.store.create(new_task).await;
    info!(task_id = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let update = CompletionUpdate::from_json(&json_or_empty(body))?;
    let task = state.store.set_completed(&id, update.completed).await?;
    info!(task_id = %task.id, completed = task.completed, "updated task completion");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete(&id).await?;
    info!(task_id = %removed.id, "deleted task");
    Ok(StatusCode::NO_CONTENT)
}

/// Malformed or missing JSON is validated like an empty object so the
/// caller always gets the field-level error message.
fn json_or_empty(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(%rejection, "request body is not usable JSON");
            Value::Object(serde_json::Map::new())
        }
    }
}

enum ApiError {
    Validation(ValidationError),
    NotFound(String),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            Self::Validation(error) => {
                debug!(%error, "rejected invalid task request");
                (StatusCode::BAD_REQUEST, error.0.to_string())
            }
            Self::NotFound(id) => {
                debug!(task_id = %id, "task not found");
                (StatusCode::NOT_FOUND, TASK_NOT_FOUND.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
