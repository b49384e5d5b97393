//! HTTP surface: `/auth` for login, `/user` for the signed-in user's
//! sessions and timesheets, `/admin` for administration and reporting.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
