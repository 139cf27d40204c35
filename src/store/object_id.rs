//! Native document identifier
//!
//! Identifiers are 12 bytes, rendered as 24 lowercase hex characters:
//! 4-byte big-endian unix seconds, 5 bytes unique to this process, and a
//! 3-byte big-endian counter.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

/// Length of the hex text form
pub const OBJECT_ID_HEX_LEN: usize = 24;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Malformed identifier text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid identifier: {reason}")]
pub struct InvalidIdentifier {
    pub input: String,
    pub reason: &'static str,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

struct Generator {
    process_unique: [u8; 5],
    counter: AtomicU32,
}

fn generator() -> &'static Generator {
    static GENERATOR: OnceLock<Generator> = OnceLock::new();
    GENERATOR.get_or_init(|| {
        let seed = uuid::Uuid::new_v4().into_bytes();
        let mut process_unique = [0u8; 5];
        process_unique.copy_from_slice(&seed[..5]);
        let start = u32::from_be_bytes([0, seed[5], seed[6], seed[7]]);
        Generator {
            process_unique,
            counter: AtomicU32::new(start),
        }
    })
}

impl ObjectId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp().max(0) as u32;
        Self::from_parts(secs, generator())
    }

    fn from_parts(secs: u32, gen: &Generator) -> Self {
        let count = gen.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&gen.process_unique);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24-character hex form. Either case is accepted.
    pub fn parse_str(input: &str) -> Result<Self, InvalidIdentifier> {
        let invalid = |reason| InvalidIdentifier {
            input: input.to_string(),
            reason,
        };

        if input.len() != OBJECT_ID_HEX_LEN {
            return Err(invalid("expected 24 hexadecimal characters"));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(input, &mut bytes)
            .map_err(|_| invalid("contains non-hexadecimal characters"))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Seconds since the unix epoch at generation time
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_round_trip() {
        let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_uppercase_input_is_normalised() {
        let id: ObjectId = "65A1F0C2E4B0A1B2C3D4E5F6".parse().unwrap();
        assert_eq!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = ObjectId::parse_str("abc123").unwrap_err();
        assert_eq!(err.input, "abc123");
        assert!(ObjectId::parse_str("").is_err());
        assert!(ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f600").is_err());
    }

    #[test]
    fn test_rejects_non_hex() {
        let err = ObjectId::parse_str("zza1f0c2e4b0a1b2c3d4e5f6").unwrap_err();
        assert_eq!(err.reason, "contains non-hexadecimal characters");
        // 24 bytes but not 24 ASCII characters
        assert!(ObjectId::parse_str("ééééééééééää").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_layout() {
        let gen = Generator {
            process_unique: [1, 2, 3, 4, 5],
            counter: AtomicU32::new(0x00FF_FFFF),
        };

        let first = ObjectId::from_parts(0x65A1_F0C2, &gen);
        assert_eq!(first.to_hex(), "65a1f0c20102030405ffffff");
        assert_eq!(first.timestamp(), 0x65A1_F0C2);

        // counter wraps within three bytes
        let second = ObjectId::from_parts(0x65A1_F0C2, &gen);
        assert_eq!(second.to_hex(), "65a1f0c20102030405000000");
    }

    #[test]
    fn test_serde_as_string() {
        let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("65a1f0c2e4b0a1b2c3d4e5f6"));

        let back: ObjectId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_value::<ObjectId>(serde_json::json!("nope")).is_err());
    }
}
