use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    server::{app::AppState, error::ApiError, extractors::ApiJson},
    telemetry::record_quiz_question,
};

use super::ApiResponse;

/// Quiz category id that stands for every category.
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

// clients send the id as a number, or as a string when it comes from a form
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Question,
}

/// Uniformly random question whose id is not in `previous`.
fn pick_unanswered<R: Rng + ?Sized>(
    questions: Vec<Question>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Option<Question> {
    let unanswered: Vec<Question> = questions
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    unanswered.choose(rng).cloned()
}

async fn next_question(
    State(pool): State<SqlitePool>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<Json<QuizQuestion>> {
    let category_id = request.quiz_category.id;
    let questions = if category_id == ALL_CATEGORIES {
        get_all_questions(&pool).await?
    } else {
        get_questions_for_category(&pool, category_id).await?
    };
    let previous: HashSet<i64> = request.previous_questions.into_iter().collect();

    let question =
        pick_unanswered(questions, &previous, &mut rand::thread_rng()).ok_or(ApiError::NotFound)?;

    record_quiz_question(category_id);
    tracing::debug!(
        category_id,
        question_id = question.id,
        answered = previous.len(),
        "Serving quiz question"
    );

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
