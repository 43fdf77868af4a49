mod sqlite;
mod traits;

pub use sqlite::SqliteListingStore;
pub use traits::ListingStore;
