//! Authentication and account handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Json},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::AppResult;

use super::extractors::ValidatedJson;
use super::state::AppState;
use crate::service::SignUpKind;

/// Header carrying the caller's email on sign-out
pub const USER_EMAIL_HEADER: &str = "user-email";

/// Credentials for sign-in and sign-up
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Sign-up body; same shape as sign-in
pub type SignUpRequest = SignInRequest;

/// Accounts whose lock is switched
#[derive(Debug, Deserialize, Validate)]
pub struct LockRequest {
    pub emails: Vec<String>,
}

/// `{ "message": ... }` response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Sign in; the message carries the bearer token
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<MessageResponse>> {
    let token = state.auth.sign_in(&payload.email, &payload.password).await?;
    Ok(MessageResponse::new(token))
}

/// Sign out the account named in the `user-email` header
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    // Without the header the empty-email session key is cleared
    let email = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    state.auth.sign_out(email).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sign_up_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .sign_up(&payload.email, &payload.password, SignUpKind::Customer)
        .await?;
    Ok(MessageResponse::new("A verification email was sent to you"))
}

pub async fn sign_up_employee(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .sign_up(&payload.email, &payload.password, SignUpKind::Employee)
        .await?;
    Ok(MessageResponse::new(
        "A verification email was sent to the employee",
    ))
}

/// Verification link target. Always answers with an HTML page.
pub async fn verify_account(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Html<String> {
    Html(state.auth.verify(&token).await)
}

pub async fn switch_locked(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LockRequest>,
) -> AppResult<StatusCode> {
    state.auth.switch_locked(&payload.emails).await?;
    Ok(StatusCode::NO_CONTENT)
}
