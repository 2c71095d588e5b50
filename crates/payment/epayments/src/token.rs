use std::{
    fmt,
    time::{Duration, Instant},
};

/// Bearer token from the password grant.
///
/// Tokens are short lived, so the client hands them to the caller instead of
/// keeping one around.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    token_type: Option<String>,
    expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        AccessToken {
            value: value.into(),
            token_type: None,
            expires_at: None,
        }
    }

    pub(crate) fn issued(
        value: String,
        token_type: Option<String>,
        expires_in: Option<u64>,
    ) -> Self {
        AccessToken {
            value,
            token_type,
            expires_at: expires_in
                .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs))),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Unknown expiry counts as valid.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let token = AccessToken::issued("abc".to_owned(), Some("bearer".to_owned()), Some(0));
        assert!(token.is_expired());

        let token = AccessToken::issued("abc".to_owned(), None, Some(3600));
        assert!(!token.is_expired());

        assert!(!AccessToken::new("abc").is_expired());
    }

    #[test]
    fn test_unrepresentable_expiry_never_expires() {
        let token = AccessToken::issued("abc".to_owned(), None, Some(u64::MAX));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_bearer() {
        let token = AccessToken::new("abc");
        assert_eq!("Bearer abc", token.bearer());
        assert!(!format!("{:?}", token).contains("abc"));
    }
}
