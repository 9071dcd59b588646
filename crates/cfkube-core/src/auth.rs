use serde::{Deserialize, Serialize};

/// Identity of the caller on whose behalf a store operation runs.
///
/// The manifest engine never inspects this value; it is handed through to
/// every collaborator so the backing store can enforce its own access rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthInfo {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_name.is_empty()
    }
}
