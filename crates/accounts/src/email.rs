//! Email address value object.

use serde::{Deserialize, Serialize};

use crewmarket_core::{DomainError, DomainResult, ValueObject};

/// A syntactically plausible email address.
///
/// Validation is deliberately shallow (non-empty local part and domain); the
/// delivery channel is the real arbiter of whether an address exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(DomainError::validation(format!(
                "not a valid email address: {raw:?}"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for EmailAddress {}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for EmailAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses_and_trims_whitespace() {
        let email = EmailAddress::parse("  crew@kroo.site ").unwrap();
        assert_eq!(email.as_str(), "crew@kroo.site");
    }

    #[test]
    fn rejects_addresses_without_local_part_or_domain() {
        assert!(EmailAddress::parse("@kroo.site").is_err());
        assert!(EmailAddress::parse("crew@nodot").is_err());
        assert!(EmailAddress::parse("plainstring").is_err());
    }
}
