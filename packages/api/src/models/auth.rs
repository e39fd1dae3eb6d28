use serde::{Deserialize, Serialize};

/// Token pair issued by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Login credentials, sent form-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// One-time code for accounts with two-factor login enabled.
    pub otp: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            otp: None,
        }
    }

    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }

    /// Form fields in the order the OAuth2 password flow expects.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        if let Some(otp) = self.otp.as_ref().filter(|otp| !otp.is_empty()) {
            fields.push(("scope".to_string(), otp.clone()));
        }
        fields
    }
}

/// JSON body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}
