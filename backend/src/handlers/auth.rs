//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use stocklink_shared::{validate_not_blank, validate_password, validate_username, Role};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppResult, ErrorResponse, ValidationErrorResponse};
use crate::extract::ApiJson;
use crate::services::auth::{AuthSession, RegisterInput, UserProfile};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom = "validate_username")]
    pub username: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    /// Defaults to `user`
    pub role: Option<Role>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom = "validate_not_blank")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    fn new(message: &str, session: AuthSession) -> Self {
        Self {
            message: message.to_string(),
            token: session.token,
            user: session.user,
        }
    }
}

/// Register endpoint handler
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ValidationErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate()?;

    let input = RegisterInput {
        username: body.username,
        password: body.password,
        role: body.role,
    };

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new("User created", session)),
    ))
}

/// Login endpoint handler
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ValidationErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service
        .login(body.username.trim(), &body.password)
        .await?;

    Ok(Json(AuthResponse::new("Login successful", session)))
}
