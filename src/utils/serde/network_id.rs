//! Deserialization of EVM network ids.
//!
//! Network ids are accepted as JSON integers, decimal strings or `0x`-prefixed
//! hex strings.
use std::fmt;

use serde::{de, Deserializer};

/// Parses a decimal or `0x`-prefixed hex network id.
pub fn parse_network_id(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    match parsed {
        Ok(0) => Err("network id must be positive".to_string()),
        Ok(id) => Ok(id),
        Err(e) => Err(format!("invalid network id {:?}: {}", value, e)),
    }
}

#[derive(Debug)]
struct NetworkIdVisitor;

impl de::Visitor<'_> for NetworkIdVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer or a string containing one")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        parse_network_id(value).map_err(de::Error::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value == 0 {
            Err(de::Error::custom("network id must be positive"))
        } else {
            Ok(value)
        }
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value <= 0 {
            Err(de::Error::custom("network id must be positive"))
        } else {
            Ok(value as u64)
        }
    }
}

pub fn deserialize_network_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NetworkIdVisitor)
}
