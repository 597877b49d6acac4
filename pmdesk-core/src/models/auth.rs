//! Authentication payloads.

use super::user::User;
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of a token refresh response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// New bearer token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Body of a login or registration response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated account.
    pub user: User,
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Registration request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Account email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
