use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{NewUser, ProfileUpdate, User, UserStore};
use crate::error::{HashError, StoreError, ValidationError};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Outcome of a signup attempt. `EmailExists` is an expected business
/// outcome, not an error.
#[derive(Debug)]
pub enum SignupOutcome {
    Created { user_id: Uuid },
    EmailExists,
}

/// Outcome of a login attempt. The unknown-email / wrong-password split is
/// deliberate (the UI distinguishes them) even though it reveals whether an
/// account exists.
#[derive(Debug)]
pub enum LoginOutcome {
    Success { user_id: Uuid },
    UserNotFound,
    InvalidPassword,
}

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register a new user: validate, check email uniqueness, hash the password,
/// insert. The pre-check and insert are not atomic; the unique index on email
/// is authoritative, so a write-time duplicate maps to the same outcome.
pub async fn signup(
    users: &dyn UserStore,
    input: SignupInput,
) -> Result<SignupOutcome, AuthServiceError> {
    let name = input.name.trim();
    let email = input.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(ValidationError::EmptyField { field: "name" }.into());
    }
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        }
        .into());
    }

    if users.find_by_email(&email).await?.is_some() {
        return Ok(SignupOutcome::EmailExists);
    }

    let password_hash = hash_password(&input.password)?;
    match users
        .insert(NewUser {
            name: name.to_string(),
            email,
            password_hash,
        })
        .await
    {
        Ok(user) => Ok(SignupOutcome::Created { user_id: user.id }),
        // Lost the race to a concurrent signup with the same email.
        Err(StoreError::Duplicate(_)) => Ok(SignupOutcome::EmailExists),
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AuthServiceError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail.into());
    }

    let Some(user) = users.find_by_email(&email).await? else {
        return Ok(LoginOutcome::UserNotFound);
    };

    if !verify_password(password, &user.password_hash)? {
        return Ok(LoginOutcome::InvalidPassword);
    }

    Ok(LoginOutcome::Success { user_id: user.id })
}

/// Apply a profile update for an existing user. Returns `None` when the user
/// id is unknown.
pub async fn update_profile(
    users: &dyn UserStore,
    id: Uuid,
    update: ProfileUpdate,
) -> Result<Option<User>, AuthServiceError> {
    if update.name.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "name" }.into());
    }
    let updated = users
        .update_profile(
            id,
            ProfileUpdate {
                name: update.name.trim().to_string(),
                ..update
            },
        )
        .await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    /// In-memory double for `UserStore`. `race_duplicate` simulates losing
    /// the check-then-insert race: the lookup sees nothing but the insert
    /// still hits the unique index.
    #[derive(Default)]
    struct MemoryUserStore {
        users: Mutex<Vec<User>>,
        race_duplicate: bool,
    }

    impl MemoryUserStore {
        fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if self.race_duplicate || users.iter().any(|u| u.email == new.email) {
                return Err(StoreError::Duplicate("users_email_key".into()));
            }
            let user = User {
                id: Uuid::new_v4(),
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                role: None,
                bio: None,
                image: None,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn update_profile(
            &self,
            id: Uuid,
            update: ProfileUpdate,
        ) -> Result<Option<User>, StoreError> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            user.name = update.name;
            user.role = update.role;
            user.bio = update.bio;
            user.image = update.image;
            Ok(Some(user.clone()))
        }
    }

    fn signup_input(name: &str, email: &str, password: &str) -> SignupInput {
        SignupInput {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn signup_creates_user_and_stores_only_the_hash() {
        let store = MemoryUserStore::default();
        let outcome = signup(&store, signup_input("Alice", "alice@x.com", "password1"))
            .await
            .unwrap();
        assert!(matches!(outcome, SignupOutcome::Created { .. }));
        assert_eq!(store.len(), 1);

        let stored = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "password1");
        assert!(verify_password("password1", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_returns_email_exists_and_creates_no_row() {
        let store = MemoryUserStore::default();
        signup(&store, signup_input("Alice", "alice@x.com", "password1"))
            .await
            .unwrap();
        let outcome = signup(&store, signup_input("Bob", "alice@x.com", "password2"))
            .await
            .unwrap();
        assert!(matches!(outcome, SignupOutcome::EmailExists));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn lost_uniqueness_race_still_reports_email_exists() {
        let store = MemoryUserStore {
            race_duplicate: true,
            ..Default::default()
        };
        let outcome = signup(&store, signup_input("Alice", "alice@x.com", "password1"))
            .await
            .unwrap();
        assert!(matches!(outcome, SignupOutcome::EmailExists));
    }

    #[tokio::test]
    async fn signup_rejects_invalid_input_before_storage() {
        let store = MemoryUserStore::default();

        let err = signup(&store, signup_input("", "alice@x.com", "password1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthServiceError::Validation(ValidationError::EmptyField { field: "name" })
        ));

        let err = signup(&store, signup_input("Alice", "not-an-email", "password1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthServiceError::Validation(ValidationError::InvalidEmail)
        ));

        let err = signup(&store, signup_input("Alice", "alice@x.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthServiceError::Validation(ValidationError::PasswordTooShort { min: 8 })
        ));

        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_email_and_wrong_password() {
        let store = MemoryUserStore::default();
        signup(&store, signup_input("Alice", "alice@x.com", "password1"))
            .await
            .unwrap();

        let outcome = login(&store, "alice@x.com", "password1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Success { .. }));

        let outcome = login(&store, "alice@x.com", "password2").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidPassword));

        let outcome = login(&store, "bob@x.com", "password1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::UserNotFound));
    }

    #[tokio::test]
    async fn email_is_normalized_on_both_paths() {
        let store = MemoryUserStore::default();
        signup(&store, signup_input("Alice", "  ALICE@X.com ", "password1"))
            .await
            .unwrap();
        let outcome = login(&store, "alice@x.com", "password1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn update_profile_applies_fields_and_rejects_empty_name() {
        let store = MemoryUserStore::default();
        let SignupOutcome::Created { user_id } =
            signup(&store, signup_input("Alice", "alice@x.com", "password1"))
                .await
                .unwrap()
        else {
            panic!("signup should succeed");
        };

        let updated = update_profile(
            &store,
            user_id,
            ProfileUpdate {
                name: "Alice Smith".into(),
                role: Some("teacher".into()),
                bio: Some("Math teacher".into()),
                image: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(updated.role.as_deref(), Some("teacher"));

        let err = update_profile(
            &store,
            user_id,
            ProfileUpdate {
                name: "  ".into(),
                role: None,
                bio: None,
                image: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AuthServiceError::Validation(ValidationError::EmptyField { field: "name" })
        ));
    }

    #[tokio::test]
    async fn update_profile_for_unknown_user_returns_none() {
        let store = MemoryUserStore::default();
        let updated = update_profile(
            &store,
            Uuid::new_v4(),
            ProfileUpdate {
                name: "Nobody".into(),
                role: None,
                bio: None,
                image: None,
            },
        )
        .await
        .unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn email_regex_accepts_and_rejects() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("spaces in@mail.com"));
    }
}
