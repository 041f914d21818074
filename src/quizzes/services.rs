use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{StoreError, ValidationError};
use crate::quizzes::repo::{NewQuestion, NewQuiz, QuizRecord, QuizStore};

pub const MIN_OPTIONS: usize = 2;

/// Outcome of a quiz-creation attempt, consumed by exhaustive matching.
/// A duplicate join code is an expected business outcome, not an error.
#[derive(Debug)]
pub enum CreateQuizOutcome {
    Created(QuizRecord),
    CodeExists,
}

#[derive(Debug, Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct QuizSubmission {
    pub title: String,
    pub subject: String,
    pub code: String,
    pub creator_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub questions: Vec<QuestionSubmission>,
}

#[derive(Debug)]
pub struct QuestionSubmission {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

fn validate(submission: &QuizSubmission) -> Result<(), ValidationError> {
    for (field, value) in [
        ("title", &submission.title),
        ("subject", &submission.subject),
        ("code", &submission.code),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField { field });
        }
    }

    if submission.start_time >= submission.end_time {
        return Err(ValidationError::InvalidTimeWindow);
    }

    if submission.questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    for (index, question) in submission.questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionText { index });
        }
        if question.options.len() < MIN_OPTIONS {
            return Err(ValidationError::TooFewOptions {
                index,
                min: MIN_OPTIONS,
            });
        }
        if question.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ValidationError::EmptyOption { index });
        }
        if question.answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer { index });
        }
        // The stored answer must be answerable from the presented options.
        if !question.options.iter().any(|o| o == &question.answer) {
            return Err(ValidationError::AnswerNotInOptions { index });
        }
    }

    Ok(())
}

/// Create a quiz with its questions: validate, check join-code uniqueness,
/// insert everything in one transaction. The pre-check and insert are not
/// atomic; the unique index on code is authoritative, so a write-time
/// duplicate maps to the same `CodeExists` outcome.
pub async fn create_quiz(
    quizzes: &dyn QuizStore,
    submission: QuizSubmission,
) -> Result<CreateQuizOutcome, QuizServiceError> {
    validate(&submission)?;

    let code = submission.code.trim().to_string();
    if quizzes.find_by_code(&code).await?.is_some() {
        return Ok(CreateQuizOutcome::CodeExists);
    }

    let new = NewQuiz {
        title: submission.title.trim().to_string(),
        subject: submission.subject.trim().to_string(),
        code,
        creator_id: submission.creator_id,
        start_time: submission.start_time,
        end_time: submission.end_time,
        questions: submission
            .questions
            .into_iter()
            .map(|q| NewQuestion {
                text: q.text,
                options: q.options,
                answer: q.answer,
            })
            .collect(),
    };

    match quizzes.insert_with_questions(new).await {
        Ok(record) => Ok(CreateQuizOutcome::Created(record)),
        // Lost the race to a concurrent creation with the same code.
        Err(StoreError::Duplicate(_)) => Ok(CreateQuizOutcome::CodeExists),
        Err(e) => Err(e.into()),
    }
}
