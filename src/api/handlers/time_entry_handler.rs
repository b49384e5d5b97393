//! Clock-in/clock-out handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::user_handler::ProjectRequest;
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{TimeEntry, TimeEntryDetails};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClockOutRequest {
    #[validate(range(min = 1, message = "Entry ID must be a positive integer"))]
    #[schema(example = 12)]
    pub entry_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockResponse {
    #[schema(example = "Clocked in successfully")]
    pub message: String,
    pub entry: TimeEntry,
}

/// Optional calendar-date filter
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    #[param(value_type = Option<String>, format = Date, example = "2024-03-13")]
    pub date: Option<NaiveDate>,
}

pub fn time_entry_routes() -> Router<AppState> {
    Router::new()
        .route("/clock-in", post(clock_in))
        .route("/clock-out", post(clock_out))
        .route("/active-entries", get(active_entries))
        .route("/time-entries", get(list_time_entries))
}

/// Start a session on an assigned project
#[utoipa::path(
    post,
    path = "/user/clock-in",
    tag = "Time Entries",
    security(("bearer_auth" = [])),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Session started", body = ClockResponse),
        (status = 403, description = "Project not actively assigned"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Already clocked in to this project")
    )
)]
pub async fn clock_in(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<Json<ClockResponse>> {
    let entry = state
        .time_entry_service
        .clock_in(current_user.id, payload.project_id)
        .await?;

    Ok(Json(ClockResponse {
        message: "Clocked in successfully".into(),
        entry,
    }))
}

/// Close one of the current user's open sessions
#[utoipa::path(
    post,
    path = "/user/clock-out",
    tag = "Time Entries",
    security(("bearer_auth" = [])),
    request_body = ClockOutRequest,
    responses(
        (status = 200, description = "Session closed", body = ClockResponse),
        (status = 403, description = "Entry belongs to another user"),
        (status = 404, description = "Time entry not found"),
        (status = 409, description = "Time entry is not active")
    )
)]
pub async fn clock_out(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ClockOutRequest>,
) -> AppResult<Json<ClockResponse>> {
    let entry = state
        .time_entry_service
        .clock_out(payload.entry_id, current_user.id)
        .await?;

    Ok(Json(ClockResponse {
        message: "Clocked out successfully".into(),
        entry,
    }))
}

/// Open sessions of the current user
#[utoipa::path(
    get,
    path = "/user/active-entries",
    tag = "Time Entries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open sessions", body = Vec<TimeEntryDetails>)
    )
)]
pub async fn active_entries(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TimeEntryDetails>>> {
    let entries = state
        .time_entry_service
        .active_entries(current_user.id)
        .await?;
    Ok(Json(entries))
}

/// Session history of the current user
#[utoipa::path(
    get,
    path = "/user/time-entries",
    tag = "Time Entries",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Sessions, newest first", body = Vec<TimeEntryDetails>)
    )
)]
pub async fn list_time_entries(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<DateQuery>,
) -> AppResult<Json<Vec<TimeEntryDetails>>> {
    let entries = state
        .time_entry_service
        .user_time_entries(current_user.id, query.date)
        .await?;
    Ok(Json(entries))
}
