use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::quizzes::repo::{PgQuizStore, QuizStore};

/// Shared application state, built once in `main` and injected into every
/// handler. The store adapters sit behind trait objects so services can be
/// exercised against in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub quizzes: Arc<dyn QuizStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let quizzes = Arc::new(PgQuizStore::new(db.clone())) as Arc<dyn QuizStore>;
        Self {
            db,
            config,
            users,
            quizzes,
        }
    }
}
