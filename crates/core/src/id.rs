//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a category (assigned by the store on insert).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of a product.
///
/// Minted identifiers have the shape `P` followed by a zero-padded numeric
/// suffix of at least [`ProductId::SUFFIX_WIDTH`] digits (`P100001`).
/// Caller-supplied identifiers only need to be non-blank; they take part in
/// minting only when they follow the same shape with at most
/// [`ProductId::MAX_SUFFIX_DIGITS`] digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub const PREFIX: char = 'P';
    pub const SUFFIX_WIDTH: usize = 6;
    pub const MAX_LEN: usize = 64;
    pub const MAX_SUFFIX_DIGITS: usize = 18;
    /// Largest suffix the minter will ever issue.
    pub const MAX_SUFFIX: u64 = 999_999_999_999_999_999;

    /// Build the identifier for a numeric suffix: `P` + suffix zero-padded to 6 digits.
    pub fn minted(suffix: u64) -> Self {
        Self(format!("{}{:0width$}", Self::PREFIX, suffix, width = Self::SUFFIX_WIDTH))
    }

    /// Parse a caller-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ProductId: must not be blank"));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::invalid_id(format!(
                "ProductId: longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Numeric suffix when the identifier is `P` followed only by digits,
    /// at most [`Self::MAX_SUFFIX_DIGITS`] of them. Longer suffixes are opaque.
    pub fn suffix(&self) -> Option<u64> {
        let digits = self.0.strip_prefix(Self::PREFIX)?;
        if digits.is_empty()
            || digits.len() > Self::MAX_SUFFIX_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_zero_padded() {
        assert_eq!(ProductId::minted(1).as_str(), "P000001");
        assert_eq!(ProductId::minted(100001).as_str(), "P100001");
        assert_eq!(ProductId::minted(1234567).as_str(), "P1234567");
    }

    #[test]
    fn suffix_requires_prefix_and_digits() {
        assert_eq!(ProductId::parse("P100042").unwrap().suffix(), Some(100042));
        assert_eq!(ProductId::parse("P001").unwrap().suffix(), Some(1));
        assert_eq!(ProductId::parse("PXYZ").unwrap().suffix(), None);
        assert_eq!(ProductId::parse("P").unwrap().suffix(), None);
        assert_eq!(ProductId::parse("P+12").unwrap().suffix(), None);
        assert_eq!(ProductId::parse("X100001").unwrap().suffix(), None);
    }

    #[test]
    fn suffix_beyond_eighteen_digits_is_opaque() {
        let max = ProductId::parse("P999999999999999999").unwrap();
        assert_eq!(max.suffix(), Some(ProductId::MAX_SUFFIX));
        assert_eq!(ProductId::parse("P18446744073709551615").unwrap().suffix(), None);
        assert_eq!(ProductId::parse("P0000000000000000001").unwrap().suffix(), None);
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(ProductId::parse("  P7 ").unwrap().as_str(), "P7");

        let err = ProductId::parse("   ").unwrap_err();
        match err {
            DomainError::InvalidId(_) => {}
            _ => panic!("Expected InvalidId error for blank id"),
        }

        let long = "P".repeat(ProductId::MAX_LEN + 1);
        assert!(ProductId::parse(&long).is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a minted id always reports back the suffix it was minted from.
            #[test]
            fn minted_suffix_is_preserved(n in 0u64..10_000_000_000) {
                let id = ProductId::minted(n);
                prop_assert_eq!(id.suffix(), Some(n));
                prop_assert!(id.as_str().len() >= 1 + ProductId::SUFFIX_WIDTH);
            }

            /// Property: ordering of minted suffixes matches numeric ordering.
            #[test]
            fn minted_suffix_order_is_numeric(a in 0u64..1_000_000, b in 0u64..1_000_000) {
                let (ia, ib) = (ProductId::minted(a), ProductId::minted(b));
                prop_assert_eq!(ia.suffix().cmp(&ib.suffix()), a.cmp(&b));
            }
        }
    }
}
