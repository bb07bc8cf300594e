//! Authentication token record.

use serde::{Deserialize, Serialize};

/// Response body of `POST /auth/get-token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Token {
    pub token: String,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token").field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_deserialize() {
        let token: Token = serde_json::from_str(r#"{"token":"abc123"}"#).unwrap();
        assert_eq!(token.token, "abc123");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token { token: "secret".into() };
        assert!(!format!("{token:?}").contains("secret"));
    }
}
