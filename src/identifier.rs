//! Wallet identifier validation
//!
//! Accepted form: `kaspa:` followed by 1 to 90 ASCII alphanumeric
//! characters. Surrounding whitespace is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Required literal prefix
pub const PREFIX: &str = "kaspa:";
/// Maximum number of characters after the prefix
pub const MAX_BODY_LEN: usize = 90;

/// Why an identifier was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Nothing entered
    Empty,
    /// Does not start with `kaspa:`
    MissingPrefix,
    /// Prefix only
    EmptyBody,
    /// Body longer than `MAX_BODY_LEN`
    TooLong { len: usize, max: usize },
    /// Non-alphanumeric character at this position of the body
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::Empty => write!(f, "Please enter a wallet address."),
            IdentifierError::MissingPrefix => {
                write!(f, "Invalid wallet address. Must start with \"{}\".", PREFIX)
            }
            IdentifierError::EmptyBody => {
                write!(f, "Invalid wallet address. Nothing follows \"{}\".", PREFIX)
            }
            IdentifierError::TooLong { len, max } => write!(
                f,
                "Invalid wallet address. {} characters after the prefix, at most {} allowed.",
                len, max
            ),
            IdentifierError::InvalidCharacter { ch, index } => write!(
                f,
                "Invalid wallet address. Unexpected character '{}' at position {}.",
                ch,
                index + PREFIX.len() + 1
            ),
        }
    }
}

impl std::error::Error for IdentifierError {}

/// A validated wallet identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate user input
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let body = trimmed
            .strip_prefix(PREFIX)
            .ok_or(IdentifierError::MissingPrefix)?;
        if body.is_empty() {
            return Err(IdentifierError::EmptyBody);
        }

        if let Some((index, ch)) = body
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_alphanumeric())
        {
            return Err(IdentifierError::InvalidCharacter { ch, index });
        }

        // All ASCII from here, bytes == chars
        if body.len() > MAX_BODY_LEN {
            return Err(IdentifierError::TooLong {
                len: body.len(),
                max: MAX_BODY_LEN,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for tight UI (`kaspa:abcd…wxyz`)
    pub fn abbreviated(&self) -> String {
        abbreviate(&self.0)
    }
}

/// Shorten long identifiers to prefix, head and tail
pub fn abbreviate(identifier: &str) -> String {
    let body = identifier.strip_prefix(PREFIX).unwrap_or(identifier);
    let chars: Vec<char> = body.chars().collect();
    if chars.len() <= 12 {
        return identifier.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    let prefix = if identifier.starts_with(PREFIX) { PREFIX } else { "" };
    format!("{}{}…{}", prefix, head, tail)
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_prefixed_alphanumeric() {
        let id = Identifier::parse("kaspa:abc123").unwrap();
        assert_eq!(id.as_str(), "kaspa:abc123");
    }

    #[test]
    fn test_trims_whitespace() {
        let id: Identifier = "  kaspa:qz0abc \n".parse().unwrap();
        assert_eq!(id.to_string(), "kaspa:qz0abc");
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        assert_eq!(Identifier::parse("notkaspa:xyz"), Err(IdentifierError::MissingPrefix));
        assert_eq!(Identifier::parse("KASPA:xyz"), Err(IdentifierError::MissingPrefix));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Identifier::parse("   "), Err(IdentifierError::Empty));
        assert_eq!(Identifier::parse("kaspa:"), Err(IdentifierError::EmptyBody));
    }

    #[test]
    fn test_rejects_bad_characters() {
        assert_eq!(
            Identifier::parse("kaspa:ab-c"),
            Err(IdentifierError::InvalidCharacter { ch: '-', index: 2 })
        );
        assert!(Identifier::parse("kaspa:abc def").is_err());
        assert!(Identifier::parse("kaspa:abcé").is_err());
    }

    #[test]
    fn test_length_bound() {
        let max = format!("kaspa:{}", "a".repeat(MAX_BODY_LEN));
        assert!(Identifier::parse(&max).is_ok());

        let over = format!("kaspa:{}", "a".repeat(MAX_BODY_LEN + 1));
        assert_eq!(
            Identifier::parse(&over),
            Err(IdentifierError::TooLong {
                len: MAX_BODY_LEN + 1,
                max: MAX_BODY_LEN
            })
        );
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let msg = IdentifierError::MissingPrefix.to_string();
        assert!(msg.contains("kaspa:"));
        let msg = IdentifierError::InvalidCharacter { ch: '!', index: 0 }.to_string();
        assert!(msg.contains("position 7"));
    }

    #[test]
    fn test_serde_validates() {
        let id: Identifier = serde_json::from_str("\"kaspa:abc\"").unwrap();
        assert_eq!(id.as_str(), "kaspa:abc");
        assert!(serde_json::from_str::<Identifier>("\"bitcoin:abc\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"kaspa:abc\"");
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("kaspa:short"), "kaspa:short");
        assert_eq!(
            abbreviate("kaspa:qpamkvhgh0kzx50gwvvp5xs8ktmqutcy3dfs9dc3w7lm9rq0zs76vf959mmrp"),
            "kaspa:qpamkv…mmrp"
        );
    }
}
