use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Success body for signup/login: `{"success": true, "user": {"id": ...}}`.
#[derive(Debug, Serialize)]
pub struct AuthSuccess {
    pub success: bool,
    pub user: UserRef,
}

#[derive(Debug, Serialize)]
pub struct UserRef {
    pub id: Uuid,
}

impl AuthSuccess {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            success: true,
            user: UserRef { id: user_id },
        }
    }
}

/// Request body for a profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            bio: u.bio,
            image: u.image,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_success_serialization() {
        let response = AuthSuccess::new(Uuid::new_v4());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["user"]["id"].is_string());
    }

    #[test]
    fn profile_response_never_contains_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$stub".into(),
            role: Some("teacher".into()),
            bio: None,
            image: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&ProfileResponse::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("alice@x.com"));
    }
}
