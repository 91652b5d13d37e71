//! Upstream credential value object.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Session credential sent with every upstream request, masked in logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    value: String,
}

impl Credential {
    /// Creates a credential, returning `None` when the value is blank.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Returns credential as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked credential for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 10 {
            return "*".repeat(chars.len());
        }

        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| serde::de::Error::custom("credential must not be blank"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "SESSDATA=abcdef0123456789; bili_jct=feedface";

    #[test]
    fn test_blank_credential_is_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn test_credential_is_trimmed() {
        let credential = Credential::new("  token  ").unwrap();
        assert_eq!(credential.as_str(), "token");
    }

    #[test]
    fn test_debug_does_not_leak_credential() {
        let credential = Credential::new(RAW).unwrap();
        let debug_output = format!("{credential:?}");

        assert!(!debug_output.contains(RAW));
        assert!(debug_output.contains("..."));
    }

    #[test]
    fn test_short_credential_fully_masked() {
        let credential = Credential::new("abc").unwrap();
        assert_eq!(credential.masked(), "***");
    }

    #[test]
    fn test_serde_keeps_raw_value() {
        let credential = Credential::new(RAW).unwrap();
        let json = serde_json::to_string(&credential).unwrap();
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, credential);
    }
}
