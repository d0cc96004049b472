use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::{seq::IteratorRandom, Rng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::queries::{questions, questions::Question},
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_QUESTION_CNTR,
};

use super::{method_not_allowed, ApiResponse};

// Upper bound on how many candidates a single round draws from the store.
const QUIZ_POOL_SIZE: i64 = 5;

#[derive(Deserialize)]
struct QuizRound {
    quiz_category: QuizCategory,
    previous_questions: Vec<i64>,
}

#[derive(Deserialize)]
struct QuizCategory {
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<QuizResponse> {
    let Json(body) = body.map_err(|err| ApiError::Unprocessable(err.into()))?;
    let round: QuizRound =
        serde_json::from_value(body).map_err(|err| ApiError::Unprocessable(err.into()))?;

    // Category 0 stands for "any category" and gets a store-shuffled pool.
    let candidates = if round.quiz_category.id == 0 {
        questions::get_random_questions(&pool, QUIZ_POOL_SIZE).await
    } else {
        questions::get_quiz_questions_for_category(&pool, round.quiz_category.id, QUIZ_POOL_SIZE)
            .await
    }
    .map_err(|err| ApiError::Unprocessable(err.into()))?;

    let question = draw_question(candidates, &round.previous_questions, &mut rand::thread_rng());
    if let Some(question) = &question {
        QUIZ_QUESTION_CNTR
            .with_label_values(&[question.category.to_string().as_str()])
            .inc();
    }

    Ok(Json(QuizResponse { question }))
}

// An exhausted pool is not an error; the round simply ends with no question.
fn draw_question(
    candidates: Vec<Question>,
    previous: &[i64],
    rng: &mut impl Rng,
) -> Option<Question> {
    candidates
        .into_iter()
        .filter(|question| !previous.contains(&question.id))
        .choose(rng)
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question).fallback(method_not_allowed))
        .with_state(state)
}
