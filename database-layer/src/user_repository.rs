use async_trait::async_trait;
use auth_identity::error::Result;
use auth_identity::models::{NewUser, Role, User};
use auth_identity::password::PasswordHasher;
use auth_identity::policy;
use auth_identity::repository::UserRepository;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, full_name, email, role, is_verified, phone, specialty, city, \
                            bio, consultation_fee, password_hash, created_at, updated_at";

/// One row of the `users` table. The hash rides along for credential checks
/// and is dropped before the row leaves this crate.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    email: String,
    role: String,
    is_verified: bool,
    phone: Option<String>,
    specialty: Option<String>,
    city: Option<String>,
    bio: Option<String>,
    consultation_fee: Option<i64>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(User {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            role,
            is_verified: self.is_verified,
            phone: self.phone,
            specialty: self.specialty,
            city: self.city,
            bio: self.bio,
            consultation_fee: self.consultation_fee,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Credential store over PostgreSQL. Hash-on-write: plaintext passwords are
/// hashed here, inside the store boundary, before any row is touched.
pub struct PostgresUserRepository {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Result<Self> {
        Ok(Self {
            pool,
            hasher: PasswordHasher::new()?,
        })
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
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
        sqlx::query(
            "INSERT INTO users (id, full_name, email, role, is_verified, phone, specialty, \
             city, bio, consultation_fee, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(&user.phone)
        .bind(&user.specialty)
        .bind(&user.city)
        .bind(&user.bio)
        .bind(user.consultation_fee)
        .bind(&password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_by_email(email)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        match self.fetch_by_email(email).await? {
            Some(row) => {
                if self.hasher.verify(password, &row.password_hash).await? {
                    row.into_user().map(Some)
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
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_token_digest = NULL, \
             reset_token_expires_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token_digest = $2, reset_token_expires_at = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(digest)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token_digest = NULL, reset_token_expires_at = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_token_digest = $1 AND reset_token_expires_at > $2"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(digest)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_verified = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(verified)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_doctors(
        &self,
        specialty: Option<&str>,
        city: Option<&str>,
    ) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'doctor' AND is_verified = TRUE \
             AND ($1::TEXT IS NULL OR specialty ILIKE '%' || $1 || '%') \
             AND ($2::TEXT IS NULL OR city ILIKE '%' || $2 || '%') \
             ORDER BY full_name"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(specialty)
            .bind(city)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRow::into_user)
            .collect()
    }
}
