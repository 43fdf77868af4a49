mod sqlite;
mod traits;

pub use sqlite::SqliteTriviaStore;
pub use traits::TriviaStore;
