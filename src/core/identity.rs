//! Identity atoms.
//!
//! ComponentId: catalog item identifier, assigned by ingestion.
//! VendorKey: vendor identifier, unique per component (offer-map key).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidId};

/// Alphabet shared by component ids and vendor keys.
///
/// Ids arrive as hex object-ids or slug-like strings; vendor keys come from
/// feed configuration. We accept the lowercase superset for both.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz-_";

fn validate(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("empty".into());
    }
    let canonical = raw.to_lowercase();
    for c in canonical.bytes() {
        if !ID_ALPHABET.contains(&c) {
            return Err("contains invalid character".into());
        }
    }
    Ok(canonical)
}

/// Component identifier - stable, immutable after creation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Parse and canonicalize (lowercase) a component id string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match validate(s) {
            Ok(canonical) => Ok(Self(canonical)),
            Err(reason) => Err(InvalidId::Component {
                raw: s.to_string(),
                reason,
            }
            .into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({:?})", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vendor key - offer-map key within one component.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorKey(String);

impl VendorKey {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match validate(s) {
            Ok(canonical) => Ok(Self(canonical)),
            Err(reason) => Err(InvalidId::Vendor {
                raw: s.to_string(),
                reason,
            }
            .into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VendorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VendorKey({:?})", self.0)
    }
}

impl fmt::Display for VendorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_canonicalizes_case() {
        let err = ComponentId::parse("5C0E9A.01").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidId(InvalidId::Component { .. })
        ));

        let id = ComponentId::parse("5C0E9A01").unwrap();
        assert_eq!(id.as_str(), "5c0e9a01");
    }

    #[test]
    fn empty_ids_rejected() {
        assert!(ComponentId::parse("").is_err());
        assert!(VendorKey::parse("").is_err());
    }

    #[test]
    fn vendor_key_accepts_slug_chars() {
        let key = VendorKey::parse("spartan_geek-mx").unwrap();
        assert_eq!(key.as_str(), "spartan_geek-mx");
    }
}
