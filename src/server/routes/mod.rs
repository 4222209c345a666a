mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use serde::Deserialize;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

use super::deserializers::deserialize_lenient_page;
use super::error::ApiError;
use crate::db::{Category, Question};

pub type ApiResponse<T> = Result<T, ApiError>;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `{"<id>": "<type>"}`, the shape clients use to look categories up by id.
pub type CategoryMap = BTreeMap<i64, String>;

pub fn category_map(categories: impl IntoIterator<Item = Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// 1-indexed page of the already loaded list. Pages past the end, or below 1,
/// are empty.
pub fn paginate(questions: Vec<Question>, page: i64) -> Vec<Question> {
    if page < 1 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(QUESTIONS_PER_PAGE);
    questions
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: i64) -> Vec<Question> {
        (1..=n)
            .map(|id| Question {
                id,
                question: format!("question {id}"),
                answer: format!("answer {id}"),
                category: 1,
                difficulty: 1,
            })
            .collect()
    }

    fn ids(page: Vec<Question>) -> Vec<i64> {
        page.into_iter().map(|q| q.id).collect()
    }

    #[test]
    fn pages_hold_at_most_ten_questions() {
        assert_eq!(ids(paginate(questions(23), 1)), (1..=10).collect::<Vec<_>>());
        assert_eq!(ids(paginate(questions(23), 2)), (11..=20).collect::<Vec<_>>());
        assert_eq!(ids(paginate(questions(23), 3)), vec![21, 22, 23]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(paginate(questions(23), 4).is_empty());
        assert!(paginate(questions(23), 0).is_empty());
        assert!(paginate(questions(23), -3).is_empty());
        assert!(paginate(questions(23), i64::MAX).is_empty());
        assert!(paginate(Vec::new(), 1).is_empty());
    }

    #[test]
    fn category_map_serializes_with_string_keys() {
        let map = category_map(vec![
            Category {
                id: 2,
                kind: "Art".to_owned(),
            },
            Category {
                id: 1,
                kind: "Science".to_owned(),
            },
        ]);
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({"1": "Science", "2": "Art"})
        );
    }
}
