use crate::error::{IdentityError, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _};
use uuid::Uuid;

/// Argon2id password hashing with the work offloaded to the blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    throwaway_hash: String,
}

impl PasswordHasher {
    pub fn new() -> Result<Self> {
        let argon2 = Argon2::default();
        // Hash of a value nobody knows, verified against whenever a lookup
        // misses so the miss costs the same as a mismatch.
        let salt = SaltString::generate(&mut OsRng);
        let throwaway_hash = argon2
            .hash_password(Uuid::new_v4().to_string().as_bytes(), &salt)
            .map_err(|_| IdentityError::Hashing)?
            .to_string();
        Ok(Self {
            argon2,
            throwaway_hash,
        })
    }

    /// Hash a plaintext password. CPU-intensive; runs on the blocking pool.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| IdentityError::Hashing)
        })
        .await
        .map_err(|_| IdentityError::Hashing)?
    }

    /// Verify a plaintext password against a stored PHC-format hash.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|_| IdentityError::Hashing)?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(_) => Err(IdentityError::Hashing),
            }
        })
        .await
        .map_err(|_| IdentityError::Hashing)?
    }

    /// Burn one verification against the throwaway hash. Called on the
    /// no-such-account path so its timing matches a password mismatch.
    pub async fn dummy_verify(&self) {
        let _ = self.verify("throwaway", &self.throwaway_hash).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hasher = PasswordHasher::new().unwrap();
        let hash = hasher.hash("correct horse battery staple").await.unwrap();
        assert_ne!(hash, "correct horse battery staple");
        assert!(hasher.verify("correct horse battery staple", &hash).await.unwrap());
        assert!(!hasher.verify("wrong password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let hasher = PasswordHasher::new().unwrap();
        let first = hasher.hash("same input").await.unwrap();
        let second = hasher.hash("same input").await.unwrap();
        assert_ne!(first, second);
    }
}
