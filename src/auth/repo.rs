use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Store adapter for the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails with `StoreError::Duplicate` when the email
    /// unique constraint is violated.
    async fn insert(&self, new: NewUser) -> Result<User, StoreError>;

    /// Apply a profile update, returning the updated row or `None` when the
    /// user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, bio, image, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, bio, image, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, bio, image, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, role = $3, bio = $4, image = $5
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, bio, image, created_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.role)
        .bind(&update.bio)
        .bind(&update.image)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
