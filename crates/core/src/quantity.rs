//! Quantity buckets and the rules binding translation values to their key.
//!
//! A singular key owns values whose quantity is `None`; a plural key owns
//! values bucketed as ZERO, ONE or OTHER. Independently of plurality,
//! `(key, language, quantity)` identifies at most one value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::repository::ValueRepository;
use crate::types::DbId;

/// Plural category of a translation value (simplified CLDR set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityBucket {
    Zero,
    One,
    Other,
}

impl QuantityBucket {
    /// Buckets a plural key may use.
    pub const PLURAL: [QuantityBucket; 3] = [
        QuantityBucket::Zero,
        QuantityBucket::One,
        QuantityBucket::Other,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            QuantityBucket::Zero => "zero",
            QuantityBucket::One => "one",
            QuantityBucket::Other => "other",
        }
    }
}

impl fmt::Display for QuantityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuantityBucket::PLURAL
            .into_iter()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| format!("Invalid quantity string '{s}'"))
    }
}

/// Returns `true` if a value bucketed as `quantity` may belong to a key with
/// the given plurality.
pub fn is_valid_for(is_plural: bool, quantity: Option<QuantityBucket>) -> bool {
    is_plural == quantity.is_some()
}

/// Check the quantity policy for a value about to be created.
pub fn validate_quantity(
    is_plural: bool,
    quantity: Option<QuantityBucket>,
) -> Result<(), CoreError> {
    if is_valid_for(is_plural, quantity) {
        return Ok(());
    }
    let expected = if is_plural {
        "one of zero, one, other"
    } else {
        "null"
    };
    let got = quantity.map_or("null", QuantityBucket::as_str);
    Err(CoreError::UnprocessableRule(format!(
        "Quantity string not valid: expected {expected} for this key, got {got}"
    )))
}

/// Reject a value whose `(key, language, quantity)` slot is already taken.
///
/// The storage unique constraint remains the final guard against concurrent
/// inserts; this check gives the common case a precise message.
pub async fn ensure_slot_free(
    values: &dyn ValueRepository,
    key_id: DbId,
    language_id: DbId,
    quantity: Option<QuantityBucket>,
) -> Result<(), CoreError> {
    if values
        .find_by_slot(key_id, language_id, quantity)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(
            "Value already exists for this key, language and quantity".into(),
        ));
    }
    Ok(())
}
