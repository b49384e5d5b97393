//! Handlers for the signed-in user's projects and weekly timesheets.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::time_entry_handler::time_entry_routes;
use crate::api::extractors::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{AssignedProject, DayHours, Timesheet, TimesheetDetails};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Week selector for the timesheet listing. Any day of the week works.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    #[param(value_type = String, format = Date, example = "2024-03-10")]
    pub week_start: NaiveDate,
}

/// Hours to add to a week's timesheet
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveTimesheetRequest {
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    #[schema(example = 1)]
    pub project_id: i32,
    /// Any day of the target week; stored under that week's Sunday
    #[schema(value_type = String, format = Date, example = "2024-03-10")]
    pub week_start: NaiveDate,
    #[validate(nested)]
    pub hours: DayHours,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveTimesheetResponse {
    #[schema(example = "Timesheet saved successfully")]
    pub message: String,
    pub timesheet: Timesheet,
}

/// Request naming one project
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProjectRequest {
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    #[schema(example = 1)]
    pub project_id: i32,
}

/// Project id taken from the URL
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectPath {
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    pub project_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteProjectResponse {
    #[schema(example = "Project completed successfully")]
    pub message: String,
    /// Hours recorded on the project's active timesheets
    #[schema(example = 37.5)]
    pub total_hours: f64,
}

/// Create routes for the signed-in user
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/timesheets", get(list_timesheets).post(save_timesheet))
        .route("/complete-project", post(complete_project))
        .route("/remove-project/:project_id", delete(remove_project))
        .merge(time_entry_routes())
}

/// List projects the current user is actively assigned to
#[utoipa::path(
    get,
    path = "/user/projects",
    tag = "Timesheets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active projects", body = Vec<AssignedProject>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<AssignedProject>>> {
    let projects = state.project_service.user_projects(current_user.id).await?;
    Ok(Json(projects))
}

/// List the current user's timesheets for one week
#[utoipa::path(
    get,
    path = "/user/timesheets",
    tag = "Timesheets",
    security(("bearer_auth" = [])),
    params(WeekQuery),
    responses(
        (status = 200, description = "Timesheets for the week", body = Vec<TimesheetDetails>),
        (status = 400, description = "Missing or invalid week_start"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_timesheets(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<WeekQuery>,
) -> AppResult<Json<Vec<TimesheetDetails>>> {
    let timesheets = state
        .timesheet_service
        .user_timesheets(current_user.id, query.week_start)
        .await?;
    Ok(Json(timesheets))
}

/// Add hours to a week's timesheet
#[utoipa::path(
    post,
    path = "/user/timesheets",
    tag = "Timesheets",
    security(("bearer_auth" = [])),
    request_body = SaveTimesheetRequest,
    responses(
        (status = 200, description = "Hours added", body = SaveTimesheetResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Project not actively assigned"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn save_timesheet(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SaveTimesheetRequest>,
) -> AppResult<Json<SaveTimesheetResponse>> {
    let timesheet = state
        .timesheet_service
        .save_timesheet(
            current_user.id,
            payload.project_id,
            payload.week_start,
            payload.hours.into(),
        )
        .await?;

    Ok(Json(SaveTimesheetResponse {
        message: "Timesheet saved successfully".into(),
        timesheet,
    }))
}

/// Complete a project and archive its timesheets
#[utoipa::path(
    post,
    path = "/user/complete-project",
    tag = "Timesheets",
    security(("bearer_auth" = [])),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project completed", body = CompleteProjectResponse),
        (status = 404, description = "Project not assigned to the user")
    )
)]
pub async fn complete_project(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<Json<CompleteProjectResponse>> {
    let total_hours = state
        .timesheet_service
        .complete_project(current_user.id, payload.project_id)
        .await?;

    Ok(Json(CompleteProjectResponse {
        message: "Project completed successfully".into(),
        total_hours,
    }))
}

/// Remove an active project from the current user's timesheet
#[utoipa::path(
    delete,
    path = "/user/remove-project/{project_id}",
    tag = "Timesheets",
    security(("bearer_auth" = [])),
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project removed", body = MessageResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not assigned to the user"),
        (status = 409, description = "Project is not active")
    )
)]
pub async fn remove_project(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(path): ValidatedPath<ProjectPath>,
) -> AppResult<Json<MessageResponse>> {
    state
        .timesheet_service
        .remove_project(current_user.id, path.project_id)
        .await?;

    Ok(Json(MessageResponse::new("Project removed from timesheet")))
}
