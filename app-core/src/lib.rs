pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pagination;

pub use config::ServiceConfig;
pub use db::Database;
pub use error::{CoreError, Result};
pub use pagination::Page;
