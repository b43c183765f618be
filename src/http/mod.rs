//! HTTP transport over the pipeline.

pub mod routes;
pub mod state;

pub use routes::triage_routes;
pub use state::AppState;
