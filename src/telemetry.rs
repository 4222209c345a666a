use anyhow::Context;
use prometheus::{register_int_counter_vec, IntCounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

// registration can only fail on a duplicate metric name, which is a bug in this file
lazy_static! {
    static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served to quiz sessions",
        &["category"]
    )
    .unwrap();
    static ref QUESTION_CHANGES: IntCounterVec = register_int_counter_vec!(
        "question_changes_total",
        "Number of questions created or deleted through the API",
        &["change"]
    )
    .unwrap();
}

#[derive(Clone, Copy, Debug)]
pub enum QuestionChange {
    Created,
    Deleted,
}

impl QuestionChange {
    fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Deleted => "deleted",
        }
    }
}

/// `category_id` 0 stands for a quiz over every category.
pub fn record_quiz_question(category_id: i64) {
    QUIZ_QUESTIONS_SERVED
        .with_label_values(&[category_id.to_string().as_str()])
        .inc();
}

pub fn record_question_change(change: QuestionChange) {
    QUESTION_CHANGES.with_label_values(&[change.label()]).inc();
}

/// Logs go to stdout, filtered by `LOG_LEVEL` (`info,sqlx=warn` when unset).
/// `INCLUDE_SPAN_EVENTS=true` also logs span enter/exit.
pub fn init_tracing() -> anyhow::Result<()> {
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    let fmt_layer = fmt::layer().with_span_events(if span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    });

    let filter_layer = match std::env::var("LOG_LEVEL") {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid LOG_LEVEL `{directives}`"))?,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .context("Tracing subscriber already installed")
}
