//! Validated e-mail address.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An e-mail address that passed shape validation.
///
/// Validation is shallow: one `@`, a non-empty local part and a
/// dotted domain. Deliverability is not our concern. Addresses are kept as
/// entered (after trimming) and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| DomainError::validation("email must contain '@'"))?;

        if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("email is not a valid address"));
        }

        let labels_ok = domain.split('.').count() >= 2 && domain.split('.').all(|l| !l.is_empty());
        if !labels_ok {
            return Err(DomainError::validation("email domain is not valid"));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        let email = Email::parse("  alice@example.com ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "alice", "@example.com", "alice@", "alice@example", "a@b@c.com", "al ice@example.com", "alice@.com"] {
            assert!(Email::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: Email = serde_json::from_str("\"bob@shop.io\"").unwrap();
        assert_eq!(ok.as_str(), "bob@shop.io");
        assert!(serde_json::from_str::<Email>("\"bob\"").is_err());
    }
}
