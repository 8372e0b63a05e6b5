use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("Message could not be built: {0}")]
    InvalidMessage(String),

    #[error("Email configuration error: {0}")]
    Configuration(String),
}

pub type EmailResult<T> = std::result::Result<T, EmailError>;
