use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{AdminSession, AdminUser, LoginInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Exchange email/password for a backend session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default().with_admin("admin@example.com", "Secret123"));
    /// let svc = AuthService::new(repo);
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "admin@example.com".into(), password: "Secret123".into() })).unwrap();
    /// assert_eq!(session.user.email, "admin@example.com");
    /// assert!(!session.access_token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AdminSession, AuthError> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }
        let session = self.repo.sign_in(email, &input.password).await?;
        info!(user_id = %session.user.id, email = %session.user.email, "admin_signed_in");
        Ok(session)
    }

    /// Invalidate the backend session. Unknown tokens are not an error.
    #[instrument(skip(self, access_token))]
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        self.repo.sign_out(access_token).await?;
        debug!("admin_signed_out");
        Ok(())
    }

    /// Resolve the signed-in admin for a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockAuthRepository, errors::AuthError};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()));
    /// let err = tokio_test::block_on(svc.current_user("nope")).unwrap_err();
    /// assert!(matches!(err, AuthError::Unauthorized));
    /// ```
    #[instrument(skip(self, access_token))]
    pub async fn current_user(&self, access_token: &str) -> Result<AdminUser, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        self.repo.current_user(access_token).await?.ok_or(AuthError::Unauthorized)
    }
}
