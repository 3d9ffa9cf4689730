//! Identifier types for central banks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a central bank rate source.
///
/// Keys are stored lower-case, so `"Russia"` and `"russia"` name the same bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Create a new country key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_lowercase())
    }

    /// Bank of Russia.
    pub fn russia() -> Self {
        Self::new("russia")
    }

    /// Bank of Thailand.
    pub fn thailand() -> Self {
        Self::new("thailand")
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is blank, i.e. no bank was named at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Country {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Country {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_is_normalized() {
        assert_eq!(Country::new(" Russia "), Country::russia());
        assert_eq!(Country::from("THAILAND").as_str(), "thailand");
    }

    #[test]
    fn test_country_serde_roundtrip_is_plain_string() {
        let json = serde_json::to_string(&Country::thailand()).unwrap();
        assert_eq!(json, "\"thailand\"");

        let parsed: Country = serde_json::from_str("\"Russia\"").unwrap();
        assert_eq!(parsed, Country::russia());
    }

    #[test]
    fn test_blank_country() {
        assert!(Country::new("   ").is_empty());
        assert!(!Country::russia().is_empty());
    }
}
