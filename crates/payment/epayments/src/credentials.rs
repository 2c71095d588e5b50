use std::{fmt, time::Duration};

pub const SANDBOX_URL: &str = "https://test-ms.epayments.com";
pub const LIVE_URL: &str = "https://ms.epayments.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const REDACTED: &str = "***";

/// Which gateway host requests go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
    Custom(String),
}

impl Environment {
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Live => LIVE_URL,
            Environment::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

/// Merchant identity issued on registration.
#[derive(Clone)]
pub struct Credentials {
    shop_id: i64,
    secret_key: String,
    username: Option<String>,
    password: Option<String>,
    environment: Environment,
    timeout: Duration,
}

impl Credentials {
    /// Sandbox is the default environment.
    pub fn new(shop_id: i64, secret_key: impl Into<String>) -> Self {
        Credentials {
            shop_id,
            secret_key: secret_key.into(),
            username: None,
            password: None,
            environment: Environment::Sandbox,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// API user for the password grant.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_test_mode(&mut self, sandbox: bool) -> bool {
        self.environment = if sandbox {
            Environment::Sandbox
        } else {
            Environment::Live
        };
        sandbox
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    pub fn shop_id(&self) -> i64 {
        self.shop_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn base_url(&self) -> &str {
        self.environment.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("shop_id", &self.shop_id)
            .field("secret_key", &REDACTED)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_mode_switch() {
        let mut credentials = Credentials::new(1, "key");
        assert!(credentials.is_sandbox());
        assert_eq!(SANDBOX_URL, credentials.base_url());

        assert!(!credentials.set_test_mode(false));
        assert_eq!(LIVE_URL, credentials.base_url());

        credentials.set_test_mode(true);
        assert_eq!(SANDBOX_URL, credentials.base_url());
    }

    #[test]
    fn test_custom_base_url() {
        let credentials = Credentials::new(1, "key")
            .with_environment(Environment::Custom("http://127.0.0.1:8080/".to_owned()));
        assert_eq!("http://127.0.0.1:8080", credentials.base_url());
        assert!(!credentials.is_sandbox());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let credentials = Credentials::new(7, "top-secret").with_user("merchant", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("merchant"));
    }
}
