//! Basic authentication for the REST endpoint.

/// Username and API secret for Basic auth. The same username is used for the
/// login handshake.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Authorization` header value.
    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_encoded() {
        let credentials = Credentials::new("fred", "secret");
        // base64("fred:secret")
        assert_eq!(credentials.to_basic_auth(), "Basic ZnJlZDpzZWNyZXQ=");
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let credentials = Credentials::new("fred", "hunter2");
        let printed = format!("{credentials:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }
}
