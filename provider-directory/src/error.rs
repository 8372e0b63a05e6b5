use auth_identity::IdentityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error(transparent)]
    Store(#[from] IdentityError),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
