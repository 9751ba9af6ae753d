use secrecy::{ExposeSecret, SecretString};

/// Supplies session credentials for outgoing requests.
///
/// Obtaining them (signing in, reading a browser profile) happens elsewhere; this is
/// only the injection point.
pub trait CredentialProvider: Send + Sync {
    /// Value for the `Cookie` header, or `None` when there is no session.
    fn cookie_header(&self) -> Option<SecretString>;
}

/// A fixed cookie header, typically from configuration.
#[derive(Clone, Default)]
pub struct StaticCookies {
    cookie: Option<SecretString>,
}

impl StaticCookies {
    pub fn new(cookie: Option<SecretString>) -> Self {
        Self { cookie }
    }
}

impl CredentialProvider for StaticCookies {
    fn cookie_header(&self) -> Option<SecretString> {
        self.cookie
            .as_ref()
            .filter(|c| !c.expose_secret().trim().is_empty())
            .cloned()
    }
}

impl std::fmt::Debug for StaticCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCookies")
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
