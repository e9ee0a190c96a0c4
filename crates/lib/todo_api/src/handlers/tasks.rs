//! Task CRUD handlers. Every route is scoped to the authenticated owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use todo_core::models::{NewTask, Task, TaskChanges};
use todo_core::tasks;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest};
use crate::services::auth::active_user;

/// `GET /api/tasks`: list the caller's tasks, optionally by completion.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    let tasks = tasks::list_tasks(state.store.as_ref(), user.id, query.completed).await?;
    Ok(Json(tasks))
}

/// `POST /api/tasks`: create a task owned by the caller.
pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    let new_task = NewTask::validated(
        user.id,
        &body.title,
        body.description.as_deref(),
        body.due_date,
    )?;
    let task = tasks::create_task(state.store.as_ref(), new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks/{id}`
pub async fn get_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<Task>> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    let task = tasks::get_task(state.store.as_ref(), user.id, task_id).await?;
    Ok(Json(task))
}

/// `PUT /api/tasks/{id}`: partial update; absent fields are left alone.
pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(body): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    let changes = TaskChanges {
        title: body.title,
        description: body.description,
        due_date: body.due_date,
    };
    let task = tasks::update_task(state.store.as_ref(), user.id, task_id, changes).await?;
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> AppResult<StatusCode> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    tasks::delete_task(state.store.as_ref(), user.id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/tasks/{id}/complete`: flip the completion flag.
pub async fn toggle_completion_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<Task>> {
    let user = active_user(state.store.as_ref(), caller.user_id).await?;
    let task = tasks::toggle_completion(state.store.as_ref(), user.id, task_id).await?;
    Ok(Json(task))
}
