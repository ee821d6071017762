use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SetId);
id_newtype!(PlayId);

/// Length of a Flow account address in hex digits.
const ADDRESS_HEX_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("contract address is empty")]
    Empty,
    #[error("contract address '{0}' is longer than 16 hex digits")]
    TooLong(String),
    #[error("contract address '{0}' contains non-hex characters")]
    NotHex(String),
}

/// Account address of a deployed contract, stored as 16 lowercase hex digits
/// without the `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress(String);

impl ContractAddress {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > ADDRESS_HEX_LEN {
            return Err(AddressError::TooLong(raw.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::NotHex(raw.to_string()));
        }

        Ok(Self(format!(
            "{:0>width$}",
            digits.to_ascii_lowercase(),
            width = ADDRESS_HEX_LEN
        )))
    }

    /// Hex digits without prefix.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// `0x`-prefixed form used in Cadence import declarations.
    pub fn to_prefixed(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

impl FromStr for ContractAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContractAddress> for String {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_address_strips_prefix_and_pads() {
        let address = ContractAddress::parse("0x0B2A3299CC857E29").expect("address");
        assert_eq!(address.as_hex(), "0b2a3299cc857e29");
        assert_eq!(address.to_prefixed(), "0x0b2a3299cc857e29");

        let short = ContractAddress::parse("f8d6e0586b0a20c7").expect("address");
        assert_eq!(short.as_hex(), "f8d6e0586b0a20c7");

        let padded = ContractAddress::parse("0x1").expect("address");
        assert_eq!(padded.as_hex(), "0000000000000001");
    }

    #[test]
    fn contract_address_rejects_bad_input() {
        assert_eq!(ContractAddress::parse("0x"), Err(AddressError::Empty));
        assert!(matches!(
            ContractAddress::parse("0x0b2a3299cc857e29ff"),
            Err(AddressError::TooLong(_))
        ));
        assert!(matches!(
            ContractAddress::parse("topshot"),
            Err(AddressError::NotHex(_))
        ));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let raw = serde_json::to_string(&SetId(42)).expect("serialize");
        assert_eq!(raw, "42");
        let play: PlayId = serde_json::from_str("9").expect("deserialize");
        assert_eq!(play, PlayId(9));
    }
}
