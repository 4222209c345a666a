use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::get_questions_for_category,
        },
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::{ApiQuery, IdPath},
    },
};

use super::{category_map, paginate, ApiResponse, CategoryMap, PageQuery};

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesList {
        success: true,
        categories: category_map(categories),
    }))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResponse<Json<CategoryQuestionsPage>> {
    let category = get_category(&pool, id).await?.ok_or(ApiError::NotFound)?;
    let questions = get_questions_for_category(&pool, id).await?;
    let total_questions = questions.len();

    Ok(Json(CategoryQuestionsPage {
        success: true,
        questions: paginate(questions, query.page()),
        total_questions,
        current_category: category_map([category]),
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
