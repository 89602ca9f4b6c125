//! Dashboard surface - JSON endpoints for the form, valuations and charts

pub mod handlers;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
