pub mod error;
pub mod models;
pub mod quiz;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;
pub mod storage;

pub use server::create_server;
pub use state::AppState;
