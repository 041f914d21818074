use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// Quiz record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub code: String,
    pub creator_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// Question record. Owned by its quiz; `position` preserves submission order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub subject: String,
    pub code: String,
    pub creator_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// A quiz together with its questions, in order.
#[derive(Debug, Clone)]
pub struct QuizRecord {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// Store adapter for quizzes and their questions.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Uniqueness pre-check: quiz row only, no questions.
    async fn find_by_code(&self, code: &str) -> Result<Option<Quiz>, StoreError>;

    /// Full fetch for join-by-code, questions in submission order.
    async fn get_by_code(&self, code: &str) -> Result<Option<QuizRecord>, StoreError>;

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Quiz>, StoreError>;

    /// Insert a quiz and all of its questions in one transaction; either the
    /// whole unit commits or nothing is visible. Fails with
    /// `StoreError::Duplicate` when the code unique constraint is violated.
    async fn insert_with_questions(&self, new: NewQuiz) -> Result<QuizRecord, StoreError>;
}

pub struct PgQuizStore {
    db: PgPool,
}

impl PgQuizStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Quiz>, StoreError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, subject, code, creator_id, start_time, end_time, created_at
            FROM quizzes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;
        Ok(quiz)
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<QuizRecord>, StoreError> {
        let Some(quiz) = self.find_by_code(code).await? else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, position, text, options, answer
            FROM questions
            WHERE quiz_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(quiz.id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(QuizRecord { quiz, questions }))
    }

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Quiz>, StoreError> {
        let rows = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, subject, code, creator_id, start_time, end_time, created_at
            FROM quizzes
            WHERE creator_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_with_questions(&self, new: NewQuiz) -> Result<QuizRecord, StoreError> {
        let mut tx = self.db.begin().await.map_err(StoreError::from)?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, subject, code, creator_id, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, subject, code, creator_id, start_time, end_time, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.subject)
        .bind(&new.code)
        .bind(new.creator_id)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&mut *tx)
        .await?;

        let mut questions = Vec::with_capacity(new.questions.len());
        for (position, q) in new.questions.into_iter().enumerate() {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (quiz_id, position, text, options, answer)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, quiz_id, position, text, options, answer
                "#,
            )
            .bind(quiz.id)
            .bind(position as i32)
            .bind(&q.text)
            .bind(&q.options)
            .bind(&q.answer)
            .fetch_one(&mut *tx)
            .await?;
            questions.push(question);
        }

        tx.commit().await.map_err(StoreError::from)?;

        Ok(QuizRecord { quiz, questions })
    }
}
