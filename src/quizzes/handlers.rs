use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::failure,
    quizzes::{
        dto::{CreateQuizRequest, Pagination, PublicQuizResponse, QuizListItem, QuizResponse},
        services::{self, CreateQuizOutcome, QuestionSubmission, QuizServiceError, QuizSubmission},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes/:code", get(get_quiz))
        .route("/users/:id/quizzes", get(list_creator_quizzes))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/quizzes", post(create_quiz))
}

#[instrument(skip(state, payload))]
async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizRequest>,
) -> Response {
    let submission = QuizSubmission {
        title: payload.title,
        subject: payload.subject,
        code: payload.code,
        creator_id: payload.creator_id,
        start_time: payload.start_time,
        end_time: payload.end_time,
        questions: payload
            .questions
            .into_iter()
            .map(|q| QuestionSubmission {
                text: q.text,
                options: q.options,
                answer: q.answer,
            })
            .collect(),
    };

    match services::create_quiz(state.quizzes.as_ref(), submission).await {
        Ok(CreateQuizOutcome::Created(record)) => {
            info!(quiz_id = %record.quiz.id, code = %record.quiz.code, "quiz created");
            (StatusCode::CREATED, Json(QuizResponse::from(record))).into_response()
        }
        Ok(CreateQuizOutcome::CodeExists) => {
            warn!("quiz creation rejected: code already exists");
            failure(
                StatusCode::CONFLICT,
                "CODE_EXISTS",
                "Quiz code already exists",
            )
        }
        Err(QuizServiceError::Validation(e)) => {
            warn!(reason = %e, "quiz creation rejected: invalid input");
            failure(StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string())
        }
        Err(QuizServiceError::Store(e)) => {
            error!(error = %e, "quiz creation failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CREATION_FAILED",
                "Failed to create quiz",
            )
        }
    }
}

#[instrument(skip(state))]
async fn get_quiz(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match state.quizzes.get_by_code(code.trim()).await {
        Ok(Some(record)) => Json(PublicQuizResponse::from(record)).into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "QUIZ_NOT_FOUND", "Quiz not found"),
        Err(e) => {
            error!(error = %e, %code, "get_quiz failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}

#[instrument(skip(state))]
async fn list_creator_quizzes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Response {
    match state.quizzes.list_by_creator(id, p.limit, p.offset).await {
        Ok(quizzes) => {
            let items: Vec<QuizListItem> = quizzes.into_iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(e) => {
            error!(error = %e, creator_id = %id, "list_creator_quizzes failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}
