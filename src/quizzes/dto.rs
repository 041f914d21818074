use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::quizzes::repo::{Question, Quiz, QuizRecord};

/// Request body for quiz creation. Wire format follows the dashboard client
/// (camelCase, RFC 3339 timestamps).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub title: String,
    pub subject: String,
    pub code: String,
    pub creator_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Full quiz returned to the creator, answers included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub code: String,
    pub creator_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub questions: Vec<QuestionResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl From<QuizRecord> for QuizResponse {
    fn from(record: QuizRecord) -> Self {
        Self {
            id: record.quiz.id,
            title: record.quiz.title,
            subject: record.quiz.subject,
            code: record.quiz.code,
            creator_id: record.quiz.creator_id,
            start_time: record.quiz.start_time,
            end_time: record.quiz.end_time,
            questions: record.questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            text: q.text,
            options: q.options,
            answer: q.answer,
        }
    }
}

/// Participant-facing view for join-by-code. Answers are withheld.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuizResponse {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
}

impl From<QuizRecord> for PublicQuizResponse {
    fn from(record: QuizRecord) -> Self {
        Self {
            id: record.quiz.id,
            title: record.quiz.title,
            subject: record.quiz.subject,
            code: record.quiz.code,
            start_time: record.quiz.start_time,
            end_time: record.quiz.end_time,
            questions: record
                .questions
                .into_iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    text: q.text,
                    options: q.options,
                })
                .collect(),
        }
    }
}

/// One row in a creator's quiz list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizListItem {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

impl From<Quiz> for QuizListItem {
    fn from(q: Quiz) -> Self {
        Self {
            id: q.id,
            title: q.title,
            subject: q.subject,
            code: q.code,
            start_time: q.start_time,
            end_time: q.end_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
