use std::fmt;

/// The single privileged identity, resolved once at startup.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` only when both values match exactly. Never errors.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_match() {
        let admin = AdminCredentials::new("minna", "s3cret");
        assert!(admin.verify("minna", "s3cret"));
    }

    #[test]
    fn rejects_any_mismatch() {
        let admin = AdminCredentials::new("minna", "s3cret");
        assert!(!admin.verify("minna", "S3cret"));
        assert!(!admin.verify("Minna", "s3cret"));
        assert!(!admin.verify("", ""));
        assert!(!admin.verify("minna ", "s3cret"));
    }
}
