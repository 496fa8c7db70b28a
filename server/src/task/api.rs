use crate::task::{Task, TaskPayload, TaskService, TaskStatus};
use crate::web::problem::{ApiError, ProblemDetail};
use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

const TITLE_REQUIRED_MESSAGE: &str = "The task title is required.";
const TITLE_TOO_LONG_MESSAGE: &str = "The task title must be at most 255 characters.";
const STATUS_REQUIRED_MESSAGE: &str =
    "Task status must be one of TODO, IN_PROGRESS, COMPLETED, OR CANCELLED";

/// Incoming task payload for create and full-update requests. Fields are
/// optional at the wire level so presence can be checked by [`TaskRequest::validate`]
/// rather than rejected during deserialization.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Title of the task, 1-255 characters
    title: Option<String>,
    /// Optional free-text description
    #[serde(default)]
    description: Option<String>,
    /// One of TODO, IN_PROGRESS, COMPLETED, CANCELLED
    status: Option<String>,
    /// Optional due date, ISO-8601
    #[serde(default)]
    due_date_time: Option<chrono::NaiveDateTime>,
}

impl TaskRequest {
    /// Checks the payload against the declared constraints and converts it
    /// into a [`TaskPayload`] the service can persist. Pure, no side effects.
    ///
    /// Missing or blank fields are reported per field in a
    /// [`ApiError::Validation`]; a status value outside the enumeration is
    /// the distinct [`ApiError::InvalidParameter`] kind, carrying the raw
    /// value.
    pub fn validate(self) -> Result<TaskPayload, ApiError> {
        let mut errors = BTreeMap::new();

        let title = match self.title {
            Some(title) if !title.trim().is_empty() => {
                if title.chars().count() > 255 {
                    errors.insert("title".to_string(), TITLE_TOO_LONG_MESSAGE.to_string());
                    None
                } else {
                    Some(title)
                }
            }
            _ => {
                errors.insert("title".to_string(), TITLE_REQUIRED_MESSAGE.to_string());
                None
            }
        };

        let status = match self.status {
            Some(raw) => match raw.parse::<TaskStatus>() {
                Ok(status) => Some(status),
                Err(value) => {
                    return Err(ApiError::InvalidParameter {
                        name: "status".to_string(),
                        value,
                    });
                }
            },
            None => {
                errors.insert("status".to_string(), STATUS_REQUIRED_MESSAGE.to_string());
                None
            }
        };

        match (title, status) {
            (Some(title), Some(status)) => Ok(TaskPayload {
                title,
                description: self.description,
                status,
                due_date_time: self.due_date_time,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// JSON representation of a task for API responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Unique identifier of the task
    id: i64,
    /// Title of the task
    title: String,
    /// Optional free-text description
    description: Option<String>,
    /// Current status of the task
    status: TaskStatus,
    /// Optional due date
    due_date_time: Option<chrono::NaiveDateTime>,
    /// When the task was created
    created_at: chrono::NaiveDateTime,
    /// When the task was last updated
    updated_at: chrono::NaiveDateTime,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            status: task.status(),
            due_date_time: task.due_date_time(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Query parameters for the status-only update.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON body extractor whose rejection goes through [`ApiError`], so a
/// malformed body produces a problem-detail response rather than axum's
/// plain-text one.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Path extractor whose rejection goes through [`ApiError`], so an
/// unparsable task id produces a problem-detail response.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Handler for POST /tasks - Creates a new task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = TaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = TaskResponse),
        (status = 400, description = "Invalid request data", body = ProblemDetail),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Json(request): Json<TaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let payload = request.validate()?;
    let service = TaskService::new(&state.db);
    let task = service.create_task(payload).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Handler for GET /tasks/{id} - Retrieves a task by its ID.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task retrieved successfully", body = TaskResponse),
        (status = 404, description = "Task not found", body = ProblemDetail),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Handler for GET /tasks - Retrieves all tasks in creation order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = [TaskResponse]),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn get_all_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Handler for PATCH /tasks/{id}/status - Updates only the status of a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/tasks/{id}/status",
    params(
        ("id" = i64, Path, description = "Task ID"),
        ("status" = String, Query, description = "New task status")
    ),
    responses(
        (status = 200, description = "Task status updated successfully", body = TaskResponse),
        (status = 400, description = "Invalid status value", body = ProblemDetail),
        (status = 404, description = "Task not found", body = ProblemDetail),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn update_task_status_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<TaskResponse>, ApiError> {
    let status = match query.status {
        Some(raw) => raw
            .parse::<TaskStatus>()
            .map_err(|value| ApiError::InvalidParameter {
                name: "status".to_string(),
                value,
            })?,
        None => {
            return Err(ApiError::InvalidArgument(
                "Missing required parameter 'status'".to_string(),
            ));
        }
    };

    let service = TaskService::new(&state.db);
    let task = service.update_task_status(id, status).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Handler for PUT /tasks/{id} - Overwrites all mutable fields of a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Task updated successfully", body = TaskResponse),
        (status = 400, description = "Invalid request data", body = ProblemDetail),
        (status = 404, description = "Task not found", body = ProblemDetail),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let payload = request.validate()?;
    let service = TaskService::new(&state.db);
    let task = service.update_task(id, payload).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Handler for DELETE /tasks/{id} - Permanently deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 404, description = "Task not found", body = ProblemDetail),
        (status = 500, description = "Internal server error", body = ProblemDetail)
    ),
    tag = "Tasks"
)]
async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = TaskService::new(&state.db);
    service.delete_task_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// OpenAPI document covering the task endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        create_task_handler,
        get_task_handler,
        get_all_tasks_handler,
        update_task_status_handler,
        update_task_handler,
        delete_task_handler
    ),
    components(schemas(TaskRequest, TaskResponse, TaskStatus, ProblemDetail)),
    tags((name = "Tasks", description = "Task management endpoints"))
)]
pub struct TaskApiDoc;

/// Creates and returns the task router with all task-related routes.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(get_all_tasks_handler).post(create_task_handler),
        )
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/tasks/{id}/status", patch(update_task_status_handler))
        .with_state(state)
}
