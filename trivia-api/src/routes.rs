use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use app_core::Page;

use crate::error::{ApiError, ApiResult};
use crate::models::{Category, NewQuestion, Question, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::quiz::QuizSelector;
use crate::state::AppState;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Quiz category id meaning "every category".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

impl PageParams {
    fn page(&self) -> Page {
        Page::new(self.page.unwrap_or(1), QUESTIONS_PER_PAGE)
    }
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<BTreeMap<i64, String>>,
    current_category: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    success: bool,
    created: i64,
    question_created: String,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
pub struct QuizResponse {
    success: bool,
    question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Body of `POST /questions`: a search when `searchTerm` is present, otherwise a new question.
#[derive(Debug, Deserialize)]
pub struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    category: Option<Value>,
    difficulty: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct QuizBody {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    id: Value,
}

fn category_map(categories: &[Category]) -> BTreeMap<i64, String> {
    categories
        .iter()
        .map(|category| (category.id, category.kind.clone()))
        .collect()
}

/// The frontend sends ids either as numbers or as the string keys of the category map.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn page_params(params: Result<Query<PageParams>, QueryRejection>) -> ApiResult<PageParams> {
    params.map(|Query(p)| p).map_err(|rejection| {
        debug!("Rejected query string: {}", rejection);
        ApiError::BadRequest
    })
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(b)| b).map_err(|rejection| {
        debug!("Rejected request body: {}", rejection);
        ApiError::BadRequest
    })
}

pub async fn health() -> impl IntoResponse {
    "OK"
}

pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    app_core::metrics::render(state.metrics.as_ref())
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn get_categories(State(state): State<AppState>) -> ApiResult<Json<CategoriesResponse>> {
    let categories = state.store.categories().await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(&categories),
    }))
}

pub async fn get_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<QuestionsResponse>> {
    let page = page_params(params)?.page();
    let questions = state.store.questions().await?;
    let current = page.slice(&questions);
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = state.store.categories().await?;
    Ok(Json(QuestionsResponse {
        success: true,
        questions: current.to_vec(),
        total_questions: questions.len(),
        categories: Some(category_map(&categories)),
        current_category: None,
    }))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let page = page_params(params)?.page();

    let existing = state.store.question(id).await.map_err(|e| {
        warn!("Failed to look up question {}: {}", id, e);
        ApiError::Unprocessable
    })?;
    if existing.is_none() {
        return Err(ApiError::NotFound);
    }

    let deleted = state.store.delete_question(id).await.map_err(|e| {
        warn!("Failed to delete question {}: {}", id, e);
        ApiError::Unprocessable
    })?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    metrics::counter!("trivia_questions_deleted_total").increment(1);

    let remaining = state.store.questions().await?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
        questions: page.slice(&remaining).to_vec(),
        total_questions: remaining.len(),
    }))
}

/// `POST /questions` either searches or creates, depending on the body.
pub async fn post_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<QuestionsBody>, JsonRejection>,
) -> ApiResult<axum::response::Response> {
    let page = page_params(params)?.page();
    let body = json_body(body)?;

    match body.search_term {
        Some(term) => search_questions(&state, page, &term)
            .await
            .map(IntoResponse::into_response),
        None => create_question(&state, page, body)
            .await
            .map(IntoResponse::into_response),
    }
}

async fn search_questions(
    state: &AppState,
    page: Page,
    term: &str,
) -> ApiResult<Json<QuestionsResponse>> {
    let matches = state.store.search_questions(term.trim()).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsResponse {
        success: true,
        questions: page.slice(&matches).to_vec(),
        total_questions: matches.len(),
        categories: None,
        current_category: None,
    }))
}

async fn create_question(
    state: &AppState,
    page: Page,
    body: QuestionsBody,
) -> ApiResult<Json<CreatedResponse>> {
    let question = non_blank(body.question).ok_or(ApiError::Unprocessable)?;
    let answer = non_blank(body.answer).ok_or(ApiError::Unprocessable)?;
    let category = body
        .category
        .as_ref()
        .and_then(as_int)
        .ok_or(ApiError::Unprocessable)?;
    let difficulty = body
        .difficulty
        .as_ref()
        .and_then(as_int)
        .filter(|d| (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(d))
        .ok_or(ApiError::Unprocessable)?;

    let new_question = NewQuestion {
        question,
        answer,
        category,
        difficulty,
    };
    let id = state.store.create_question(&new_question).await.map_err(|e| {
        warn!("Failed to create question: {}", e);
        ApiError::Unprocessable
    })?;
    metrics::counter!("trivia_questions_created_total").increment(1);

    let questions = state.store.questions().await?;
    Ok(Json(CreatedResponse {
        success: true,
        created: id,
        question_created: new_question.question,
        questions: page.slice(&questions).to_vec(),
        total_questions: questions.len(),
    }))
}

pub async fn get_questions_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<QuestionsResponse>> {
    let page = page_params(params)?.page();
    let category = state.store.category(id).await?.ok_or(ApiError::NotFound)?;
    let questions = state.store.questions_in_category(category.id).await?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions: page.slice(&questions).to_vec(),
        total_questions: questions.len(),
        categories: None,
        current_category: Some(category.kind),
    }))
}

pub async fn play_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResult<Json<QuizResponse>> {
    let body = json_body(body)?;
    let previous = body.previous_questions.ok_or(ApiError::Unprocessable)?;
    let quiz_category = body.quiz_category.ok_or(ApiError::Unprocessable)?;
    let category_id = as_int(&quiz_category.id).ok_or(ApiError::Unprocessable)?;

    let pool = if category_id == ALL_CATEGORIES {
        state.store.questions().await?
    } else {
        let category = state
            .store
            .category(category_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        state.store.questions_in_category(category.id).await?
    };

    let question = QuizSelector::new().pick(&pool, &previous);
    let message = match &question {
        Some(q) => {
            debug!("Quiz question {} served ({} previous)", q.id, previous.len());
            metrics::counter!("trivia_quiz_questions_served_total").increment(1);
            None
        }
        None => {
            metrics::counter!("trivia_quiz_exhausted_total").increment(1);
            Some("Sorry, all questions have been used!")
        }
    };

    Ok(Json(QuizResponse {
        success: true,
        question,
        message,
    }))
}
