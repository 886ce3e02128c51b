/// Bearer credentials for the catalog API.
///
/// Token acquisition and refresh happen outside this crate. Whoever owns the
/// session passes it explicitly to the client; nothing here is global state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: String,
}

impl AuthSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn bearer_token(&self) -> &str {
        &self.token
    }
}
