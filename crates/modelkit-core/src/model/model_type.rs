//! `ModelType` value codec
//!
//! The `type` column stores a short tag. Encoding is total; decoding rejects
//! anything that is not one of the known tags, it never falls back to a
//! default member.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ModelError, Result};

/// Closed enumeration stored in the `type` column
///
/// Variant order matches the lexical order of the stored tags, so ordering
/// by the column in SQL and ordering decoded values agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelType {
    Normal,
    Super,
}

impl ModelType {
    pub const ENUM_NAME: &'static str = "ModelType";

    /// Every member, in tag order
    pub const ALL: [ModelType; 2] = [ModelType::Normal, ModelType::Super];

    /// Stored representation
    pub fn encode(&self) -> &'static str {
        match self {
            ModelType::Normal => "NORMAL",
            ModelType::Super => "SUPER",
        }
    }

    /// Parse a stored tag
    ///
    /// # Errors
    /// * `InvalidTag` - `tag` is not the exact tag of any member
    pub fn decode(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|member| member.encode() == tag)
            .ok_or_else(|| ModelError::InvalidTag {
                enum_name: Self::ENUM_NAME,
                tag: tag.to_string(),
            })
    }

    /// All stored tags, in member order
    pub fn tags() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|member| member.encode())
    }

    /// Length of the longest tag, the width of the stored column
    pub fn max_tag_len() -> usize {
        Self::tags().map(str::len).max().unwrap_or(0)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

impl FromStr for ModelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_tags() {
        assert_eq!(ModelType::Normal.encode(), "NORMAL");
        assert_eq!(ModelType::Super.encode(), "SUPER");
    }

    #[test]
    fn test_decode_rejects_invalid_tag() {
        let err = ModelType::decode("INVALID_TYPE").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidTag {
                enum_name: "ModelType",
                tag: "INVALID_TYPE".to_string(),
            }
        );
        assert!(err.to_string().contains("is not a valid"));
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        assert!(ModelType::decode("normal").is_err());
        assert!(ModelType::decode(" NORMAL").is_err());
        assert!(ModelType::decode("").is_err());
    }

    #[test]
    fn test_ordering_matches_tag_order() {
        let mut tags: Vec<_> = ModelType::tags().collect();
        tags.sort_unstable();
        let decoded: Vec<_> = tags.iter().map(|t| ModelType::decode(t).unwrap()).collect();
        assert_eq!(decoded, ModelType::ALL.to_vec());
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&ModelType::Super).unwrap();
        assert_eq!(json, "\"SUPER\"");
        let back: ModelType = serde_json::from_str("\"NORMAL\"").unwrap();
        assert_eq!(back, ModelType::Normal);
    }

    #[test]
    fn test_max_tag_len() {
        assert_eq!(ModelType::max_tag_len(), 6);
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(member in prop::sample::select(ModelType::ALL.to_vec())) {
            prop_assert_eq!(ModelType::decode(member.encode()).unwrap(), member);
        }

        #[test]
        fn prop_unknown_tags_are_rejected(tag in "\\PC{0,12}") {
            prop_assume!(ModelType::tags().all(|known| known != tag));
            let is_invalid_tag = matches!(
                ModelType::decode(&tag),
                Err(ModelError::InvalidTag { .. })
            );
            prop_assert!(is_invalid_tag);
        }
    }
}
