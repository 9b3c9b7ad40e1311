//! Secure credential handling for LLM providers.
//!
//! Credentials are wrapped in [`secrecy::SecretString`] as soon as they are
//! read. `Debug` and `Display` show `[REDACTED]`; the raw value is only
//! reachable through [`ApiCredential::expose`].

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a raw value.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load from the first set, non-empty environment variable in `env_vars`.
    ///
    /// ```ignore
    /// let cred = ApiCredential::from_env_chain(&DEFAULT_API_KEY_ENVS, "Gemini API key")?;
    /// ```
    pub fn from_env_chain(env_vars: &[&str], name: &'static str) -> Result<Self, ProviderError> {
        env_vars
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure one of {} environment variables",
                    name,
                    env_vars.join(", ")
                ))
            })
    }

    /// Expose the value at the point of use (e.g. an HTTP header).
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let cred = ApiCredential::new("AIza-secret-123", CredentialSource::Programmatic, "Gemini API key");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("AIza-secret-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_display_redacts_value() {
        let cred = ApiCredential::new("AIza-secret-123", CredentialSource::Programmatic, "Gemini API key");
        let display = cred.to_string();
        assert_eq!(display, "Gemini API key from programmatic [REDACTED]");
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("key", CredentialSource::Programmatic, "k");
        assert_eq!(cred.expose(), "key");
        assert!(!cred.is_empty());
        assert!(ApiCredential::new("", CredentialSource::Programmatic, "k").is_empty());
    }

    #[test]
    fn test_missing_env_chain_errors() {
        let vars = ["LEXIPRO_TEST_UNSET_KEY_A", "LEXIPRO_TEST_UNSET_KEY_B"];
        let err = ApiCredential::from_env_chain(&vars, "Test key").unwrap_err();
        assert!(err.to_string().contains("LEXIPRO_TEST_UNSET_KEY_A, LEXIPRO_TEST_UNSET_KEY_B"));
    }
}
