use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions, questions::Question},
    server::{app::AppState, deserializers::PageQuery, error::ApiError},
};

use super::{method_not_allowed, ApiResponse};

// The paginated listing is always served under the same category label.
const CURRENT_CATEGORY: &str = "Science";

// A create body must carry exactly these four fields; anything else is
// rejected wholesale before the store is touched.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NewQuestion {
    question: String,
    answer: String,
    category: i64,
    difficulty: i64,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionPage {
    questions: Vec<Question>,
    total_questions: i64,
    current_category: &'static str,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CreatedQuestion {
    question: String,
    answer: String,
    category: String,
    difficulty: i64,
    success: bool,
    status: u16,
}

#[derive(Serialize)]
struct DeletedQuestion {
    success: bool,
    status: u16,
    deleted: i64,
    question: String,
    total_questions: i64,
    category: i64,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionPage> {
    let page = query.page();
    if page < 1 {
        return Err(ApiError::NotFound(anyhow!("page {page} is out of range")));
    }
    let questions = questions::get_questions_page(&pool, page)
        .await
        .map_err(|err| ApiError::NotFound(err.into()))?;
    if questions.is_empty() && page != 1 {
        return Err(ApiError::NotFound(anyhow!("page {page} is past the last page")));
    }

    let total_questions = questions::count_questions(&pool)
        .await
        .map_err(|err| ApiError::NotFound(err.into()))?;
    let categories = categories::get_categories(&pool)
        .await
        .map_err(|err| ApiError::NotFound(err.into()))?;

    Ok(Json(QuestionPage {
        questions,
        total_questions,
        current_category: CURRENT_CATEGORY,
        categories: categories.into_iter().map(|c| (c.id, c.name)).collect(),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<CreatedQuestion> {
    let Json(body) = body.map_err(|err| ApiError::Internal(err.into()))?;
    let new: NewQuestion =
        serde_json::from_value(body).map_err(|err| ApiError::Internal(err.into()))?;

    let category = categories::get_category(&pool, new.category)
        .await
        .map_err(|err| ApiError::BadRequest(err.into()))?
        .ok_or_else(|| ApiError::BadRequest(anyhow!("unknown category {}", new.category)))?;

    questions::create_question(&pool, &new.question, &new.answer, new.category, new.difficulty)
        .await
        .map_err(|err| ApiError::BadRequest(err.into()))?;

    Ok(Json(CreatedQuestion {
        question: new.question,
        answer: new.answer,
        category: category.name,
        difficulty: new.difficulty,
        success: true,
        status: 200,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<i64>,
) -> ApiResponse<DeletedQuestion> {
    // A missing id is reported as an internal failure, not a not-found.
    let question = questions::get_question(&pool, question_id)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?
        .ok_or_else(|| ApiError::Internal(anyhow!("question {question_id} does not exist")))?;

    questions::delete_question(&pool, question_id)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    let total_questions = questions::count_questions(&pool)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;

    Ok(Json(DeletedQuestion {
        success: true,
        status: 200,
        deleted: question_id,
        question: question.question,
        total_questions,
        category: question.category,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<SearchResults> {
    let Json(body) = body.map_err(|err| ApiError::BadRequest(err.into()))?;
    let search: SearchBody =
        serde_json::from_value(body).map_err(|err| ApiError::BadRequest(err.into()))?;

    let page = query.page();
    if page < 1 {
        return Err(ApiError::BadRequest(anyhow!("page {page} is out of range")));
    }
    let questions = questions::search_questions(&pool, &search.search_term, page)
        .await
        .map_err(|err| ApiError::BadRequest(err.into()))?;
    if questions.is_empty() && page != 1 {
        return Err(ApiError::BadRequest(anyhow!("page {page} is past the last page")));
    }

    // total_questions reports the page that was returned, not the match total.
    Ok(Json(SearchResults {
        total_questions: questions.len(),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(list_questions)
                .post(create_question)
                .fallback(method_not_allowed),
        )
        .route(
            "/questions/{question_id}",
            delete(delete_question).fallback(method_not_allowed),
        )
        .route(
            "/questions/search",
            post(search_questions).fallback(method_not_allowed),
        )
        .with_state(state)
}
