use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthContext;
use crate::server::MedibookServer;
use crate::validation::RequestValidation;
use crate::{validate_email, validate_field, validate_length, validate_required};
use auth_identity::models::{NewUser, Role, SignedToken, User};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Registration payload. Patients and professionals sign up through the same
/// endpoint; the role is part of the form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// `patient`, `doctor`, `nurse`, or `admin`.
    #[schema(value_type = String, example = "patient")]
    pub role: Role,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    /// Fee in the smallest currency unit.
    pub consultation_fee: Option<i64>,
}

impl RequestValidation for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.full_name, "Full name is required");
        validate_required!(self.email, "Email is required");
        validate_email!(self.email, "Invalid email format");
        validate_length!(
            self.password,
            8,
            128,
            "Password must be between 8 and 128 characters"
        );
        Ok(())
    }
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            full_name: request.full_name,
            email: request.email,
            password: request.password,
            role: request.role,
            phone: request.phone,
            specialty: request.specialty,
            city: request.city,
            bio: request.bio,
            consultation_fee: request.consultation_fee,
        }
    }
}

/// Login payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequestValidation for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.email, "Email is required");
        validate_required!(self.password, "Password is required");
        Ok(())
    }
}

/// Signed bearer token, as returned by register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<SignedToken> for TokenResponse {
    fn from(signed: SignedToken) -> Self {
        Self {
            token: signed.token,
            expires_at: signed.expires_at,
        }
    }
}

/// Account profile, credential-free by construction.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: Role,
    pub is_verified: bool,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    /// Fee in the smallest currency unit.
    pub consultation_fee: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            phone: user.phone,
            specialty: user.specialty,
            city: user.city,
            bio: user.bio,
            consultation_fee: user.consultation_fee,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(server): State<MedibookServer>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    request.validate()?;
    let signed = server.identity.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(signed.into())))
}

/// Authenticate and get a token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account pending admin approval"),
    )
)]
pub async fn login(
    State(server): State<MedibookServer>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    request.validate()?;
    let signed = server.identity.login(&request.email, &request.password).await?;
    Ok(Json(signed.into()))
}

/// Current account details.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    )
)]
pub async fn me(
    State(server): State<MedibookServer>,
    ctx: AuthContext,
) -> ApiResult<Json<UserResponse>> {
    let user = server.identity.current_user(ctx.user_id).await?;
    Ok(Json(user.into()))
}

/// Start a password reset.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 404, description = "No account with that email"),
        (status = 502, description = "Reset email could not be delivered"),
    )
)]
pub async fn forgot_password(
    State(server): State<MedibookServer>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    server.identity.forgot_password(&request.email).await?;
    Ok(Json(MessageResponse {
        message: "Reset email sent".to_string(),
    }))
}

/// Complete a password reset with the emailed token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/{token}",
    tag = "auth",
    request_body = ResetPasswordRequest,
    params(("token" = String, Path, description = "Plaintext reset token from the email")),
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired reset token"),
    )
)]
pub async fn reset_password(
    State(server): State<MedibookServer>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_length!(
        request.password,
        8,
        128,
        "Password must be between 8 and 128 characters"
    );
    server.identity.reset_password(&token, &request.password).await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
