use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions, questions::Question},
    server::{app::AppState, deserializers::PageQuery, error::ApiError},
};

use super::{method_not_allowed, ApiResponse};

#[derive(Serialize)]
struct CategoryMap {
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

async fn list_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoryMap> {
    let categories = categories::get_categories(&pool)
        .await
        .map_err(|err| ApiError::MethodNotAllowed(err.into()))?;

    Ok(Json(CategoryMap {
        categories: categories.into_iter().map(|c| (c.id, c.name)).collect(),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<CategoryQuestions> {
    let category = categories::get_category(&pool, category_id)
        .await
        .map_err(|err| ApiError::BadRequest(err.into()))?
        .ok_or_else(|| ApiError::BadRequest(anyhow!("unknown category {category_id}")))?;

    let page = query.page();
    if page < 1 {
        return Err(ApiError::BadRequest(anyhow!("page {page} is out of range")));
    }
    let questions = questions::get_questions_for_category(&pool, category.id, page)
        .await
        .map_err(|err| ApiError::BadRequest(err.into()))?;
    if questions.is_empty() && page != 1 {
        return Err(ApiError::BadRequest(anyhow!("page {page} is past the last page")));
    }

    // total_questions reports the page that was returned, not the category total.
    Ok(Json(CategoryQuestions {
        total_questions: questions.len(),
        questions,
        current_category: category.name,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/categories",
            get(list_categories).fallback(method_not_allowed),
        )
        .route(
            "/categories/{category_id}/questions",
            get(questions_for_category).fallback(method_not_allowed),
        )
        .with_state(state)
}
