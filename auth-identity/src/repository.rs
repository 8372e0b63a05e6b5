use crate::error::Result;
use crate::models::{NewUser, User};
use crate::password::PasswordHasher;
use crate::policy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Credential store contract.
///
/// Implementations own the password hash: plaintext passwords handed to
/// `create`, `verify_credentials`, and `set_password` are hashed before any
/// row is written (hash-on-write), and the hash never appears on [`User`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. The caller has already checked for duplicates;
    /// a unique index on the email column backs that check up. Emails are
    /// lowercased on write.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Match an email/password pair. Returns the account only on a full
    /// match; a missing account and a wrong password are indistinguishable
    /// to the caller, and both cost one hash verification.
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>>;

    /// Replace the credential (hash-on-write) and clear any pending reset
    /// token in the same update.
    async fn set_password(&self, id: Uuid, new_password: &str) -> Result<()>;

    /// Record a pending reset: the token digest and its expiry, together.
    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Drop both reset fields, returning the account to no-reset-pending.
    async fn clear_reset_token(&self, id: Uuid) -> Result<()>;

    /// Look up the account holding `digest` with an unexpired reset window.
    async fn find_by_reset_digest(&self, digest: &str, now: DateTime<Utc>)
        -> Result<Option<User>>;

    /// Flip the administrative verification flag.
    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<()>;

    /// Verified doctors, narrowed by case-insensitive partial matches on
    /// specialty and city when given.
    async fn list_doctors(&self, specialty: Option<&str>, city: Option<&str>)
        -> Result<Vec<User>>;
}

struct StoredUser {
    user: User,
    password_hash: String,
    reset_token_digest: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
}

/// In-memory credential store. Backs the test suites; behaves like the
/// Postgres implementation in every externally observable way.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, StoredUser>>,
    hasher: PasswordHasher,
}

impl InMemoryUserRepository {
    pub fn new() -> Result<Self> {
        Ok(Self {
            users: RwLock::new(HashMap::new()),
            hasher: PasswordHasher::new()?,
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let password_hash = self.hasher.hash(&new_user.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: new_user.full_name,
            email: new_user.email.to_lowercase(),
            role: new_user.role,
            is_verified: policy::initially_verified(new_user.role),
            phone: new_user.phone,
            specialty: new_user.specialty,
            city: new_user.city,
            bio: new_user.bio,
            consultation_fee: new_user.consultation_fee,
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash,
                reset_token_digest: None,
                reset_token_expires_at: None,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        let candidate = {
            let users = self.users.read().await;
            users
                .values()
                .find(|s| s.user.email == email)
                .map(|s| (s.user.clone(), s.password_hash.clone()))
        };
        match candidate {
            Some((user, hash)) => {
                if self.hasher.verify(password, &hash).await? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => {
                self.hasher.dummy_verify().await;
                Ok(None)
            }
        }
    }

    async fn set_password(&self, id: Uuid, new_password: &str) -> Result<()> {
        let password_hash = self.hasher.hash(new_password).await?;
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&id) {
            stored.password_hash = password_hash;
            stored.reset_token_digest = None;
            stored.reset_token_expires_at = None;
            stored.user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&id) {
            stored.reset_token_digest = Some(digest.to_string());
            stored.reset_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&id) {
            stored.reset_token_digest = None;
            stored.reset_token_expires_at = None;
        }
        Ok(())
    }

    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|s| {
                s.reset_token_digest.as_deref() == Some(digest)
                    && s.reset_token_expires_at.is_some_and(|exp| exp > now)
            })
            .map(|s| s.user.clone()))
    }

    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&id) {
            stored.user.is_verified = verified;
            stored.user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_doctors(
        &self,
        specialty: Option<&str>,
        city: Option<&str>,
    ) -> Result<Vec<User>> {
        let matches = |field: &Option<String>, needle: Option<&str>| match needle {
            None => true,
            Some(needle) => field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase())),
        };
        let mut doctors: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|s| s.user.role == crate::models::Role::Doctor && s.user.is_verified)
            .filter(|s| matches(&s.user.specialty, specialty))
            .filter(|s| matches(&s.user.city, city))
            .map(|s| s.user.clone())
            .collect();
        doctors.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(doctors)
    }
}
