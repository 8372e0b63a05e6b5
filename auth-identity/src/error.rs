use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("An account with this email already exists")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Your account is pending admin approval")]
    PendingApproval,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("The reset email could not be delivered")]
    DeliveryFailure,

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Password hashing failed")]
    Hashing,

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
