//! Sign-in and sign-up forms.
//!
//! Input is validated locally first; nothing reaches the network unless every
//! field is filled in (and, for sign-up, the password is long enough).

use api::{ApiError, AuthState, Client, Credentials, Transport, UserInfo};
use store::KeyValueStore;
use tokio::sync::watch;

use crate::error::ActionError;
use crate::lifecycle::BusyFlag;
use crate::notice::Notices;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_sign_in(identifier: &str, secret: &str) -> Result<(), ActionError> {
    if identifier.trim().is_empty() || secret.is_empty() {
        return Err(ActionError::invalid("Please fill in all fields"));
    }
    Ok(())
}

pub fn validate_sign_up(name: &str, identifier: &str, secret: &str) -> Result<(), ActionError> {
    if name.trim().is_empty() || identifier.trim().is_empty() || secret.is_empty() {
        return Err(ActionError::invalid("Please fill in all fields"));
    }
    if secret.chars().count() < MIN_PASSWORD_LEN {
        return Err(ActionError::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Account controller behind the sign-in, sign-up and sign-out controls.
pub struct Account<T, S> {
    client: Client<T, S>,
    notices: Notices,
    busy: BusyFlag,
}

impl<T, S> Account<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>) -> Self {
        Self {
            client,
            notices: Notices::new(),
            busy: BusyFlag::new(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn state(&self) -> AuthState {
        self.client.session().state()
    }

    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.client.session().subscribe()
    }

    pub async fn sign_in(
        &self,
        identifier: &str,
        secret: &str,
        otp: Option<&str>,
    ) -> Result<UserInfo, ActionError> {
        validate_sign_in(identifier, secret)?;
        let _guard = self.busy.try_begin().ok_or(ActionError::Busy)?;

        let mut credentials = Credentials::new(identifier.trim(), secret);
        if let Some(code) = otp.map(str::trim).filter(|c| !c.is_empty()) {
            credentials = credentials.with_otp(code);
        }

        match self.client.login(&credentials).await {
            Ok(user) => {
                self.notices.success(format!(
                    "Welcome, {}",
                    user.display_name().unwrap_or("there")
                ));
                Ok(user)
            }
            Err(e) => Err(self.fail(&e, "Could not sign in")),
        }
    }

    pub async fn sign_up(
        &self,
        name: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<UserInfo, ActionError> {
        validate_sign_up(name, identifier, secret)?;
        let _guard = self.busy.try_begin().ok_or(ActionError::Busy)?;

        match self
            .client
            .register(name.trim(), identifier.trim(), secret)
            .await
        {
            Ok(user) => {
                self.notices.success("Account created");
                Ok(user)
            }
            Err(e) => Err(self.fail(&e, "Could not create account")),
        }
    }

    pub async fn sign_out(&self) {
        self.client.logout().await;
        self.notices.info("Signed out");
    }

    // A 401 here means bad credentials, not an expired session.
    fn fail(&self, err: &ApiError, fallback: &str) -> ActionError {
        tracing::error!(error = %err, "{fallback}");
        let message = err.user_message(fallback);
        self.notices.error(message.clone());
        ActionError::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockTransport;
    use api::{Method, RequestBody};
    use serde_json::json;
    use store::MemoryStore;

    fn backend() -> MockTransport {
        let mock = MockTransport::new();
        mock.on(
            Method::POST,
            "/auth/login",
            200,
            json!({"access_token": "T1", "refresh_token": "R1", "token_type": "bearer"}),
        );
        mock.on(
            Method::GET,
            "/users/me",
            200,
            json!({"id": "u1", "email": "ayse@example.com", "created_at": "2025-11-18T09:00:00"}),
        );
        mock
    }

    #[test]
    fn test_validation() {
        assert!(validate_sign_in("a@b.com", "x").is_ok());
        assert!(matches!(validate_sign_in("  ", "x"), Err(ActionError::Invalid(_))));
        assert!(matches!(validate_sign_in("a@b.com", ""), Err(ActionError::Invalid(_))));

        assert!(validate_sign_up("Ayşe", "a@b.com", "secret").is_ok());
        assert_eq!(
            validate_sign_up("Ayşe", "a@b.com", "12345"),
            Err(ActionError::invalid("Password must be at least 6 characters"))
        );
        assert!(validate_sign_up("", "a@b.com", "secret").is_err());
    }

    #[tokio::test]
    async fn test_invalid_input_never_hits_network() {
        let mock = backend();
        let account = Account::new(Client::new(mock.clone(), MemoryStore::new()));

        assert!(account.sign_in("", "secret", None).await.is_err());
        assert!(account.sign_up("Ayşe", "a@b.com", "123").await.is_err());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_with_otp() {
        let mock = backend();
        let account = Account::new(Client::new(mock.clone(), MemoryStore::new()));

        let user = account
            .sign_in(" ayse@example.com ", "secret", Some("123456"))
            .await
            .unwrap();

        assert_eq!(user.display_name(), Some("ayse"));
        assert!(account.state().is_authenticated());
        assert_eq!(
            mock.requests_to(Method::POST, "/auth/login")[0].body,
            RequestBody::Form(vec![
                ("username".to_string(), "ayse@example.com".to_string()),
                ("password".to_string(), "secret".to_string()),
                ("scope".to_string(), "123456".to_string()),
            ])
        );
        assert!(!account.is_busy());
    }

    #[tokio::test]
    async fn test_bad_credentials_report_backend_detail() {
        let mock = MockTransport::new();
        mock.on(Method::POST, "/auth/login", 401, json!({"detail": "Incorrect email or password"}));
        let account = Account::new(Client::new(mock, MemoryStore::new()));

        let err = account.sign_in("a@b.com", "nope", None).await.unwrap_err();

        assert_eq!(err, ActionError::Failed("Incorrect email or password".to_string()));
        assert_eq!(account.notices().latest().unwrap().message, "Incorrect email or password");
        assert!(!account.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_publishes_state() {
        let account = Account::new(Client::new(backend(), MemoryStore::new()));
        account.sign_in("a@b.com", "secret", None).await.unwrap();

        let mut updates = account.watch();
        account.sign_out().await;

        assert!(updates.has_changed().unwrap());
        assert!(!updates.borrow_and_update().is_authenticated());
    }
}
