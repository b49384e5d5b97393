//! Admin handlers - users, projects, assignments and reporting.
//!
//! Every route here sits behind the admin middleware.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{
    CompletionDetails, Project, ProjectFields, SyncReport, TimesheetDetails, TimesheetFilter,
    UserResponse, UserRole,
};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").expect("valid username pattern"));

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name pattern"));

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        regex(path = *USERNAME_PATTERN, message = "Username must contain only letters, numbers, and spaces")
    )]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "Name must contain only letters and spaces")
    )]
    #[schema(example = "John Doe")]
    pub name: String,
    pub role: UserRole,
}

/// Create or update project request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProjectPayload {
    #[validate(length(min = 2, max = 100, message = "Client name must be between 2 and 100 characters"))]
    #[schema(example = "Acme Corp")]
    pub client_name: String,
    #[validate(length(min = 2, max = 100, message = "Project name must be between 2 and 100 characters"))]
    #[schema(example = "Website Redesign")]
    pub project_name: String,
    #[validate(length(min = 2, max = 50, message = "Work type must be between 2 and 50 characters"))]
    #[schema(example = "Development")]
    pub work_type: String,
    #[validate(length(min = 2, max = 100, message = "Location must be between 2 and 100 characters"))]
    #[schema(example = "Remote")]
    pub location: String,
}

impl From<ProjectPayload> for ProjectFields {
    fn from(payload: ProjectPayload) -> Self {
        Self {
            client_name: payload.client_name,
            project_name: payload.project_name,
            work_type: payload.work_type,
            location: payload.location,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectIdPath {
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    pub id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignProjectRequest {
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    #[schema(example = 2)]
    pub user_id: i32,
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    #[schema(example = 1)]
    pub project_id: i32,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/:id", put(update_project).delete(delete_project))
        .route("/assign-project", post(assign_project))
        .route("/timesheets", get(list_timesheets))
        .route("/project-completions", get(list_completions))
        .route("/sync-time-entries", post(sync_time_entries))
}

/// List all users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .create_user(payload.username, payload.password, payload.name, payload.role)
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// List all projects
#[utoipa::path(
    get,
    path = "/admin/projects",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All projects", body = Vec<Project>)
    )
)]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.project_service.list_projects().await?;
    Ok(Json(projects))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/admin/projects",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ProjectPayload,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProjectPayload>,
) -> AppResult<Created<Project>> {
    let project = state.project_service.create_project(payload.into()).await?;
    Ok(Created(project))
}

/// Update a project
#[utoipa::path(
    put,
    path = "/admin/projects/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Project ID")),
    request_body = ProjectPayload,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<ProjectIdPath>,
    ValidatedJson(payload): ValidatedJson<ProjectPayload>,
) -> AppResult<Json<Project>> {
    let project = state
        .project_service
        .update_project(path.id, payload.into())
        .await?;
    Ok(Json(project))
}

/// Delete a project and its timesheets, time entries and assignments
#[utoipa::path(
    delete,
    path = "/admin/projects/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = MessageResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<ProjectIdPath>,
) -> AppResult<Json<MessageResponse>> {
    state.project_service.delete_project(path.id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

/// Assign a project to a user
#[utoipa::path(
    post,
    path = "/admin/assign-project",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = AssignProjectRequest,
    responses(
        (status = 200, description = "Project assigned (or already assigned)", body = MessageResponse),
        (status = 404, description = "User or project not found")
    )
)]
pub async fn assign_project(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AssignProjectRequest>,
) -> AppResult<Json<MessageResponse>> {
    let created = state
        .project_service
        .assign_project(payload.user_id, payload.project_id)
        .await?;

    let message = if created {
        "Project assigned successfully"
    } else {
        "Project already assigned to this user"
    };
    Ok(Json(MessageResponse::new(message)))
}

/// List timesheets across users
#[utoipa::path(
    get,
    path = "/admin/timesheets",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(TimesheetFilter),
    responses(
        (status = 200, description = "Matching timesheets", body = Vec<TimesheetDetails>)
    )
)]
pub async fn list_timesheets(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<TimesheetFilter>,
) -> AppResult<Json<Vec<TimesheetDetails>>> {
    let timesheets = state.timesheet_service.all_timesheets(filter).await?;
    Ok(Json(timesheets))
}

/// List project completion records
#[utoipa::path(
    get,
    path = "/admin/project-completions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Completions, newest first", body = Vec<CompletionDetails>)
    )
)]
pub async fn list_completions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompletionDetails>>> {
    let completions = state.timesheet_service.project_completions().await?;
    Ok(Json(completions))
}

/// Fold completed time entries into weekly timesheets
#[utoipa::path(
    post,
    path = "/admin/sync-time-entries",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sync finished", body = SyncReport)
    )
)]
pub async fn sync_time_entries(State(state): State<AppState>) -> AppResult<Json<SyncReport>> {
    let report = state.timesheet_service.sync_time_entries().await?;
    Ok(Json(report))
}
