use app_core::db::matches_term;
use app_core::{Database, Result};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::TriviaStore;
use crate::models::{Category, NewQuestion, Question};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    type  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS questions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question    TEXT NOT NULL,
    answer      TEXT NOT NULL,
    category    INTEGER NOT NULL REFERENCES categories(id),
    difficulty  INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 5)
);
CREATE INDEX IF NOT EXISTS questions_category_idx ON questions(category);
"#;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// SQLite-backed trivia storage.
pub struct SqliteTriviaStore {
    db: Arc<Database>,
}

impl SqliteTriviaStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        db.migrate(SCHEMA)?;
        Ok(Self { db })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Arc::new(Database::open_in_memory()?))
    }

    fn row_to_question(row: &Row<'_>) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
        })
    }

    fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            kind: row.get(1)?,
        })
    }

    fn query_questions(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Question>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let questions = stmt
                .query_map(args, Self::row_to_question)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(questions)
        })
    }
}

#[async_trait]
impl TriviaStore for SqliteTriviaStore {
    async fn create_category(&self, kind: &str) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.execute("INSERT INTO categories (type) VALUES (?1)", params![kind])?;
            let id = conn.last_insert_rowid();
            info!("Created category {} with id {}", kind, id);
            Ok(id)
        })
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, type FROM categories ORDER BY id")?;
            let categories = stmt
                .query_map([], Self::row_to_category)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        })
    }

    async fn category(&self, id: i64) -> Result<Option<Category>> {
        self.db.with_conn(|conn| {
            let category = conn
                .query_row(
                    "SELECT id, type FROM categories WHERE id = ?1",
                    params![id],
                    Self::row_to_category,
                )
                .optional()?;
            Ok(category)
        })
    }

    async fn questions(&self) -> Result<Vec<Question>> {
        self.query_questions(
            &format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"),
            &[],
        )
    }

    async fn questions_in_category(&self, category_id: i64) -> Result<Vec<Question>> {
        self.query_questions(
            &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE category = ?1 ORDER BY id"),
            &[&category_id],
        )
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>> {
        debug!("Searching questions for '{}'", term);
        let questions = self.questions().await?;
        Ok(questions
            .into_iter()
            .filter(|question| matches_term(&question.question, term))
            .collect())
    }

    async fn question(&self, id: i64) -> Result<Option<Question>> {
        self.db.with_conn(|conn| {
            let question = conn
                .query_row(
                    &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
                    params![id],
                    Self::row_to_question,
                )
                .optional()?;
            Ok(question)
        })
    }

    async fn count_questions(&self) -> Result<usize> {
        self.db.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)",
                params![
                    question.question,
                    question.answer,
                    question.category,
                    question.difficulty
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!("Created question {} in category {}", id, question.category);
            Ok(id)
        })
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.db.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM questions WHERE id = ?1", params![id])?;
            if deleted > 0 {
                info!("Deleted question {}", id);
            }
            Ok(deleted > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            category,
            difficulty: 2,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_question() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let science = store.create_category("Science").await.unwrap();

        let id = store
            .create_question(&new_question("What is H2O?", science))
            .await
            .unwrap();

        let question = store.question(id).await.unwrap().unwrap();
        assert_eq!(question.question, "What is H2O?");
        assert_eq!(question.category, science);
        assert_eq!(store.count_questions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let err = store
            .create_question(&new_question("Orphan?", 99))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(store.count_questions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let art = store.create_category("Art").await.unwrap();
        store
            .create_question(&new_question("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", art))
            .await
            .unwrap();
        store
            .create_question(&new_question("Which Dutch graphic artist was a master of optical illusions?", art))
            .await
            .unwrap();
        store
            .create_question(&new_question("Discount of 100% off?", art))
            .await
            .unwrap();

        let hits = store.search_questions("TITLE").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].question.contains("entitled"));

        // Wildcards in the term are literal
        let hits = store.search_questions("%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(store.search_questions("zebra").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let art = store.create_category("Art").await.unwrap();
        store
            .create_question(&new_question("Who painted ÉTOILE?", art))
            .await
            .unwrap();

        assert_eq!(store.search_questions("ÉTOILE").await.unwrap().len(), 1);
        assert_eq!(store.search_questions("étoile").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn questions_filter_by_category() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let science = store.create_category("Science").await.unwrap();
        let history = store.create_category("History").await.unwrap();
        store.create_question(&new_question("a", science)).await.unwrap();
        store.create_question(&new_question("b", history)).await.unwrap();
        store.create_question(&new_question("c", science)).await.unwrap();

        let in_science = store.questions_in_category(science).await.unwrap();
        let texts: Vec<_> = in_science.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let store = SqliteTriviaStore::in_memory().unwrap();
        let sports = store.create_category("Sports").await.unwrap();
        let id = store.create_question(&new_question("q", sports)).await.unwrap();

        assert!(store.delete_question(id).await.unwrap());
        assert!(!store.delete_question(id).await.unwrap());
        assert!(store.question(id).await.unwrap().is_none());
    }
}
