use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{
                self, create_question, get_all_questions, get_question_by_id, search_questions,
            },
        },
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ValidationError},
        extractors::{ApiJson, ApiQuery, IdPath},
    },
    telemetry::{record_question_change, QuestionChange},
};

use super::{category_map, paginate, ApiResponse, CategoryMap, PageQuery};

/// Body of `POST /questions`: either a search (`searchTerm`) or a new question.
#[derive(Deserialize)]
struct QuestionsPayload {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

struct NewQuestion {
    question: String,
    answer: String,
    category: i64,
    difficulty: i64,
}

impl QuestionsPayload {
    /// A blank `searchTerm` does not make the request a search.
    fn search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }

    fn has_question_fields(&self) -> bool {
        self.question.is_some()
            || self.answer.is_some()
            || self.category.is_some()
            || self.difficulty.is_some()
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::Missing(field)),
        Some(v) if v.trim().is_empty() => Err(ValidationError::Empty(field)),
        Some(v) => Ok(v),
    }
}

impl TryFrom<QuestionsPayload> for NewQuestion {
    type Error = ValidationError;

    fn try_from(payload: QuestionsPayload) -> Result<Self, Self::Error> {
        Ok(NewQuestion {
            question: required_text(payload.question, "question")?,
            answer: required_text(payload.answer, "answer")?,
            category: payload
                .category
                .ok_or(ValidationError::Missing("category"))?,
            difficulty: payload
                .difficulty
                .ok_or(ValidationError::Missing("difficulty"))?,
        })
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    categories: CategoryMap,
    total_questions: usize,
    current_category: Option<CategoryMap>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<CategoryMap>,
}

#[derive(Serialize)]
struct SingleQuestion {
    success: bool,
    question: Question,
}

#[derive(Serialize)]
struct Done {
    success: bool,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = get_all_questions(&pool).await?;
    let total_questions = questions.len();
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(questions, query.page()),
        categories: category_map(categories),
        total_questions,
        current_category: None,
    }))
}

async fn question(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<SingleQuestion>> {
    let question = get_question_by_id(&pool, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(SingleQuestion {
        success: true,
        question,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<Done>> {
    get_question_by_id(&pool, id).await?.ok_or(ApiError::NotFound)?;
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    record_question_change(QuestionChange::Deleted);
    tracing::info!(question_id = id, "Deleted question");
    Ok(Json(Done { success: true }))
}

async fn post_questions(
    State(pool): State<SqlitePool>,
    ApiJson(payload): ApiJson<QuestionsPayload>,
) -> ApiResponse<Response> {
    if let Some(term) = payload.search_term() {
        let questions = search_questions(&pool, term).await?;
        return Ok(Json(SearchResults {
            success: true,
            total_questions: questions.len(),
            questions,
            current_category: None,
        })
        .into_response());
    }

    if !payload.has_question_fields() {
        return Err(ApiError::BadRequest(
            "expected `searchTerm` or the fields of a new question".to_owned(),
        ));
    }

    let new = NewQuestion::try_from(payload)?;
    let id = create_question(
        &pool,
        &new.question,
        &new.answer,
        new.category,
        new.difficulty,
    )
    .await
    .map_err(ApiError::Rejected)?;
    record_question_change(QuestionChange::Created);
    tracing::info!(question_id = id, category = new.category, "Created question");

    Ok(Json(Done { success: true }).into_response())
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(post_questions))
        .route("/questions/{id}", get(question).delete(delete_question))
        .with_state(state)
}
