pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod router;
pub mod seed;
pub mod server;
pub mod state;
pub mod storage;
pub mod templates;
pub mod views;

pub use router::app_router;
pub use state::AppState;
