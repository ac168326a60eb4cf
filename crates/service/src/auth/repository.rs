use async_trait::async_trait;

use super::domain::{AdminSession, AdminUser};
use super::errors::AuthError;

/// Repository abstraction over the backend's session auth.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
    /// `None` when the token is unknown or expired.
    async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<String, (String, AdminUser)>>, // key: email
        sessions: Mutex<HashMap<String, AdminUser>>,           // key: access token
    }

    impl MockAuthRepository {
        pub fn with_admin(self, email: &str, password: &str) -> Self {
            self.add_admin(email, password);
            self
        }

        pub fn add_admin(&self, email: &str, password: &str) -> AdminUser {
            let user = AdminUser { id: Uuid::new_v4(), email: email.to_string() };
            let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            accounts.insert(email.to_string(), (password.to_string(), user.clone()));
            user
        }

        /// Synchronous lookup used by the in-memory table backend.
        pub fn user_for(&self, access_token: &str) -> Option<AdminUser> {
            let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            sessions.get(access_token).cloned()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthError> {
            let user = {
                let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
                match accounts.get(email) {
                    Some((pw, user)) if pw == password => user.clone(),
                    _ => return Err(AuthError::InvalidCredentials),
                }
            };
            let token = Uuid::new_v4().simple().to_string();
            let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            sessions.insert(token.clone(), user.clone());
            Ok(AdminSession { user, access_token: token, refresh_token: None, expires_at: None })
        }

        async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
            let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            sessions.remove(access_token);
            Ok(())
        }

        async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>, AuthError> {
            Ok(self.user_for(access_token))
        }
    }
}
