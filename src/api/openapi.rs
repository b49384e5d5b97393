//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, time_entry_handler, user_handler};
use crate::domain::{
    AssignedProject, AssignmentStatus, CompletionDetails, DayHours, EntryStatus, Project,
    ProjectCompletion, SyncReport, TimeEntry, TimeEntryDetails, Timesheet, TimesheetDetails,
    TimesheetStatus, UserResponse, UserRole, WeekHours,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Timesheet API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timesheet API",
        version = "0.1.0",
        description = "Clock-in/clock-out time tracking with weekly timesheets and project completion"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::login,
        // Signed-in user
        user_handler::list_projects,
        user_handler::list_timesheets,
        user_handler::save_timesheet,
        user_handler::complete_project,
        user_handler::remove_project,
        time_entry_handler::clock_in,
        time_entry_handler::clock_out,
        time_entry_handler::active_entries,
        time_entry_handler::list_time_entries,
        // Admin
        admin_handler::list_users,
        admin_handler::create_user,
        admin_handler::list_projects,
        admin_handler::create_project,
        admin_handler::update_project,
        admin_handler::delete_project,
        admin_handler::assign_project,
        admin_handler::list_timesheets,
        admin_handler::list_completions,
        admin_handler::sync_time_entries,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Project,
            AssignmentStatus,
            AssignedProject,
            EntryStatus,
            TimeEntry,
            TimeEntryDetails,
            TimesheetStatus,
            WeekHours,
            DayHours,
            Timesheet,
            TimesheetDetails,
            ProjectCompletion,
            CompletionDetails,
            SyncReport,
            // Request and response types
            auth_handler::LoginRequest,
            TokenResponse,
            MessageResponse,
            user_handler::SaveTimesheetRequest,
            user_handler::SaveTimesheetResponse,
            user_handler::ProjectRequest,
            user_handler::CompleteProjectResponse,
            time_entry_handler::ClockOutRequest,
            time_entry_handler::ClockResponse,
            admin_handler::CreateUserRequest,
            admin_handler::ProjectPayload,
            admin_handler::AssignProjectRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Timesheets", description = "The signed-in user's projects and weekly timesheets"),
        (name = "Time Entries", description = "Clock-in/clock-out sessions"),
        (name = "Admin", description = "User, project and reporting administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
