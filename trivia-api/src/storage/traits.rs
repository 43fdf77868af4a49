use app_core::Result;
use async_trait::async_trait;

use crate::models::{Category, NewQuestion, Question};

/// Persistence for categories and questions.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    // Category operations
    async fn create_category(&self, kind: &str) -> Result<i64>;
    async fn categories(&self) -> Result<Vec<Category>>;
    async fn category(&self, id: i64) -> Result<Option<Category>>;

    // Question operations, all ordered by id
    async fn questions(&self) -> Result<Vec<Question>>;
    async fn questions_in_category(&self, category_id: i64) -> Result<Vec<Question>>;
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>>;
    async fn question(&self, id: i64) -> Result<Option<Question>>;
    async fn count_questions(&self) -> Result<usize>;

    async fn create_question(&self, question: &NewQuestion) -> Result<i64>;
    /// Returns false when no question had that id.
    async fn delete_question(&self, id: i64) -> Result<bool>;
}
