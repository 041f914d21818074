use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthSuccess, LoginRequest, ProfileResponse, SignupRequest, UpdateProfileRequest},
        repo::ProfileUpdate,
        services::{self, AuthServiceError, LoginOutcome, SignupInput, SignupOutcome},
    },
    error::failure,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:id", get(get_profile).put(update_profile))
}

#[instrument(skip(state, payload))]
async fn signup(State(state): State<AppState>, Json(payload): Json<SignupRequest>) -> Response {
    let input = SignupInput {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };
    match services::signup(state.users.as_ref(), input).await {
        Ok(SignupOutcome::Created { user_id }) => {
            info!(%user_id, "user signed up");
            (StatusCode::CREATED, Json(AuthSuccess::new(user_id))).into_response()
        }
        Ok(SignupOutcome::EmailExists) => {
            warn!("signup rejected: email already in use");
            failure(StatusCode::CONFLICT, "EMAIL_EXISTS", "Email already in use")
        }
        Err(AuthServiceError::Validation(e)) => {
            warn!(reason = %e, "signup rejected: invalid input");
            failure(StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string())
        }
        Err(e) => {
            error!(error = %e, "signup failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}

#[instrument(skip(state, payload))]
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    match services::login(state.users.as_ref(), &payload.email, &payload.password).await {
        Ok(LoginOutcome::Success { user_id }) => {
            info!(%user_id, "user logged in");
            Json(AuthSuccess::new(user_id)).into_response()
        }
        Ok(LoginOutcome::UserNotFound) => {
            warn!("login rejected: unknown email");
            failure(
                StatusCode::UNAUTHORIZED,
                "USER_NOT_FOUND",
                "No account found with this email",
            )
        }
        Ok(LoginOutcome::InvalidPassword) => {
            warn!("login rejected: invalid password");
            failure(
                StatusCode::UNAUTHORIZED,
                "INVALID_PASSWORD",
                "Incorrect password",
            )
        }
        Err(AuthServiceError::Validation(e)) => {
            warn!(reason = %e, "login rejected: invalid input");
            failure(StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string())
        }
        Err(e) => {
            error!(error = %e, "login failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}

#[instrument(skip(state))]
async fn get_profile(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.users.find_by_id(id).await {
        Ok(Some(user)) => Json(ProfileResponse::from(user)).into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found"),
        Err(e) => {
            error!(error = %e, %id, "get_profile failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}

#[instrument(skip(state, payload))]
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Response {
    let update = ProfileUpdate {
        name: payload.name,
        role: payload.role,
        bio: payload.bio,
        image: payload.image,
    };
    match services::update_profile(state.users.as_ref(), id, update).await {
        Ok(Some(user)) => {
            info!(user_id = %id, "profile updated");
            Json(ProfileResponse::from(user)).into_response()
        }
        Ok(None) => failure(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found"),
        Err(AuthServiceError::Validation(e)) => {
            warn!(reason = %e, "profile update rejected: invalid input");
            failure(StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string())
        }
        Err(e) => {
            error!(error = %e, %id, "update_profile failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Unexpected error",
            )
        }
    }
}
