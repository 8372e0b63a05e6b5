use crate::config::AuthConfig;
use crate::error::{IdentityError, Result};
use crate::models::{NewUser, SignedToken, User};
use crate::repository::UserRepository;
use crate::tokens::TokenIssuer;
use crate::{policy, reset};
use chrono::{Duration, Utc};
use email_service::{Mailer, OutgoingEmail};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates registration, login, and the password reset lifecycle over
/// the credential store, the notification sender, and the token issuer.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenIssuer,
    config: AuthConfig,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>, mailer: Arc<dyn Mailer>, config: AuthConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours);
        Self {
            users,
            mailer,
            tokens,
            config,
        }
    }

    /// The issuer used to mint this service's tokens; the bearer middleware
    /// verifies against the same one.
    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Create an account and sign it in.
    pub async fn register(&self, new_user: NewUser) -> Result<SignedToken> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(IdentityError::EmailAlreadyRegistered);
        }
        let user = self.users.create(new_user).await?;
        info!(user_id = %user.id, role = %user.role, "registered new account");
        self.tokens.sign(user.id, user.role)
    }

    /// Authenticate an email/password pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedToken> {
        let user = self
            .users
            .verify_credentials(email, password)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;
        // The verification gate runs only after the credential match, so an
        // unverified account is not discoverable through a distinct error
        // path before authentication.
        if policy::for_role(user.role).requires_verification && !user.is_verified {
            return Err(IdentityError::PendingApproval);
        }
        self.tokens.sign(user.id, user.role)
    }

    /// Profile of the authenticated account.
    pub async fn current_user(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    /// Start a password reset: store the token digest with its expiry and
    /// email the plaintext link. A failed delivery rolls the pending reset
    /// back before the error is surfaced, so no unusable token lingers.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        let token = reset::generate_token();
        let expires_at = Utc::now() + Duration::minutes(self.config.reset_token_ttl_minutes);
        self.users
            .set_reset_token(user.id, &reset::digest(&token), expires_at)
            .await?;

        let reset_url = format!(
            "{}/reset-password/{}",
            self.config.frontend_base_url.trim_end_matches('/'),
            token
        );
        let message = OutgoingEmail {
            to: user.email.clone(),
            subject: "Password reset".to_string(),
            body: format!(
                "You are receiving this email because a password reset was requested \
                 for your account.\n\nFollow this link within {} minutes to choose a \
                 new password:\n\n{}",
                self.config.reset_token_ttl_minutes, reset_url
            ),
        };

        if let Err(err) = self.mailer.send(message).await {
            warn!(user_id = %user.id, error = %err, "reset email delivery failed, rolling back reset token");
            self.users.clear_reset_token(user.id).await?;
            return Err(IdentityError::DeliveryFailure);
        }
        info!(user_id = %user.id, "reset email sent");
        Ok(())
    }

    /// Complete a password reset. The presented plaintext is digested and
    /// matched against accounts with an unexpired reset window; the store
    /// clears both reset fields when it writes the new credential, which is
    /// what makes the token single-use.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let user = self
            .users
            .find_by_reset_digest(&reset::digest(token), Utc::now())
            .await?
            .ok_or(IdentityError::InvalidOrExpiredToken)?;
        self.users.set_password(user.id, new_password).await?;
        info!(user_id = %user.id, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::InMemoryUserRepository;
    use async_trait::async_trait;
    use email_service::{EmailError, EmailResult};
    use std::sync::Mutex;

    /// Records every message; optionally refuses delivery.
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn last_body(&self) -> String {
            self.sent.lock().unwrap().last().unwrap().body.clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: OutgoingEmail) -> EmailResult<()> {
            self.sent.lock().unwrap().push(message);
            if self.fail {
                Err(EmailError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password: "initial-password".to_string(),
            role,
            phone: None,
            specialty: None,
            city: None,
            bio: None,
            consultation_fee: None,
        }
    }

    fn service_with(mailer: Arc<RecordingMailer>) -> (IdentityService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new().unwrap());
        let service = IdentityService::new(
            users.clone(),
            mailer,
            AuthConfig::default(),
        );
        (service, users)
    }

    /// The reset link is the last line of the email; the token is its final
    /// path segment.
    fn token_from_body(body: &str) -> String {
        body.rsplit('/').next().unwrap().trim().to_string()
    }

    #[tokio::test]
    async fn registering_the_same_email_twice_conflicts() {
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();

        let err = service
            .register(new_user("a@b.com", Role::Patient))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();

        let wrong_password = service.login("a@b.com", "not-the-password").await.unwrap_err();
        let unknown_email = service.login("nobody@b.com", "initial-password").await.unwrap_err();
        assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
        assert!(matches!(unknown_email, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unverified_doctor_gets_pending_approval_not_a_token() {
        let (service, users) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("doc@b.com", Role::Doctor)).await.unwrap();

        let err = service.login("doc@b.com", "initial-password").await.unwrap_err();
        assert!(matches!(err, IdentityError::PendingApproval));

        // After approval the same credentials sign in.
        let doctor = users.find_by_email("doc@b.com").await.unwrap().unwrap();
        users.set_verified(doctor.id, true).await.unwrap();
        service.login("doc@b.com", "initial-password").await.unwrap();
    }

    #[tokio::test]
    async fn unverified_doctor_with_wrong_password_sees_invalid_credentials() {
        // The approval gate must not leak through the wrong-password path.
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("doc@b.com", Role::Doctor)).await.unwrap();

        let err = service.login("doc@b.com", "not-the-password").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn patients_log_in_without_verification() {
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("pat@b.com", Role::Patient)).await.unwrap();
        service.login("pat@b.com", "initial-password").await.unwrap();
    }

    #[tokio::test]
    async fn current_user_excludes_nothing_it_never_had() {
        let (service, users) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();
        let user = users.find_by_email("a@b.com").await.unwrap().unwrap();

        let profile = service.current_user(user.id).await.unwrap();
        assert_eq!(profile.email, "a@b.com");

        let err = service.current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, IdentityError::UserNotFound));
    }

    #[tokio::test]
    async fn forgot_password_for_unknown_email_is_not_found() {
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        let err = service.forgot_password("nobody@b.com").await.unwrap_err();
        assert!(matches!(err, IdentityError::UserNotFound));
    }

    #[tokio::test]
    async fn reset_token_works_exactly_once() {
        let mailer = Arc::new(RecordingMailer::new());
        let (service, _) = service_with(mailer.clone());
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();

        service.forgot_password("a@b.com").await.unwrap();
        let token = token_from_body(&mailer.last_body());

        service.reset_password(&token, "brand-new-password").await.unwrap();
        service.login("a@b.com", "brand-new-password").await.unwrap();

        // Single-use: the stored digest was cleared by the first reset.
        let err = service
            .reset_password(&token, "yet-another-password")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn expired_reset_token_is_rejected() {
        let mailer = Arc::new(RecordingMailer::new());
        let (service, users) = service_with(mailer.clone());
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();

        service.forgot_password("a@b.com").await.unwrap();
        let token = token_from_body(&mailer.last_body());

        // Rewind the stored expiry past the deadline.
        let user = users.find_by_email("a@b.com").await.unwrap().unwrap();
        users
            .set_reset_token(user.id, &reset::digest(&token), Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        let err = service
            .reset_password(&token, "too-late-password")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn failed_delivery_rolls_the_reset_back() {
        let mailer = Arc::new(RecordingMailer::failing());
        let (service, _) = service_with(mailer.clone());
        service.register(new_user("a@b.com", Role::Patient)).await.unwrap();

        let err = service.forgot_password("a@b.com").await.unwrap_err();
        assert!(matches!(err, IdentityError::DeliveryFailure));

        // The token that would have been sent must not be usable.
        let token = token_from_body(&mailer.last_body());
        let err = service
            .reset_password(&token, "never-delivered")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn login_works_with_mixed_case_email() {
        let (service, _) = service_with(Arc::new(RecordingMailer::new()));
        service.register(new_user("Case@B.com", Role::Patient)).await.unwrap();
        service.login("case@b.com", "initial-password").await.unwrap();
    }
}
