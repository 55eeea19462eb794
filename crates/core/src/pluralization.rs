//! Key pluralization state machine.
//!
//! A key is either singular or plural. Flipping `is_plural` rewrites the
//! key's values; [`plan_transition`] computes that rewrite as an ordered
//! [`PluralizationPlan`] without touching storage, and the key repository
//! applies the key update and the plan in one transaction.
//!
//! Singular -> plural: every singular value is re-bucketed to OTHER and gets
//! ONE and ZERO siblings carrying the same text.
//!
//! Plural -> singular: ONE and ZERO values are deleted and OTHER values are
//! re-bucketed to singular. This direction is lossy: converting back to
//! plural copies the OTHER text into ONE and ZERO, it does not restore the
//! deleted content.

use crate::models::key::TranslationKey;
use crate::models::value::{NewValue, TranslationValue};
use crate::quantity::QuantityBucket;
use crate::types::DbId;

/// One step of a pluralization rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueChange {
    /// Permanently remove a value.
    Delete { value_id: DbId },
    /// Move an existing value to another bucket, keeping id, text and language.
    Rebucket {
        value_id: DbId,
        quantity: Option<QuantityBucket>,
    },
    /// Insert a new value.
    Create(NewValue),
}

/// Ordered list of value changes. Storage must apply them in order: deletes
/// come first so re-bucketed values never collide with a doomed sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralizationPlan {
    pub changes: Vec<ValueChange>,
}

impl PluralizationPlan {
    /// Returns `true` if applying the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compute the value rewrite for moving `key` to `target_plural`.
///
/// `values` are the key's current values across all languages. Requesting
/// the key's current plurality yields an empty plan.
pub fn plan_transition(
    key: &TranslationKey,
    target_plural: bool,
    values: &[TranslationValue],
) -> PluralizationPlan {
    if key.is_plural == target_plural {
        return PluralizationPlan::default();
    }
    let owned = values.iter().filter(|v| v.key_id == key.id);
    let changes = if target_plural {
        pluralize(owned)
    } else {
        singularize(owned)
    };
    PluralizationPlan { changes }
}

fn pluralize<'a>(values: impl Iterator<Item = &'a TranslationValue>) -> Vec<ValueChange> {
    let mut changes = Vec::new();
    for value in values.filter(|v| v.quantity.is_none()) {
        changes.push(ValueChange::Rebucket {
            value_id: value.id,
            quantity: Some(QuantityBucket::Other),
        });
        for quantity in [QuantityBucket::One, QuantityBucket::Zero] {
            changes.push(ValueChange::Create(NewValue {
                key_id: value.key_id,
                language_id: value.language_id,
                quantity: Some(quantity),
                name: value.name.clone(),
            }));
        }
    }
    changes
}

fn singularize<'a>(values: impl Iterator<Item = &'a TranslationValue>) -> Vec<ValueChange> {
    let mut deletes = Vec::new();
    let mut rebuckets = Vec::new();
    for value in values {
        match value.quantity {
            Some(QuantityBucket::One | QuantityBucket::Zero) => {
                deletes.push(ValueChange::Delete { value_id: value.id });
            }
            Some(QuantityBucket::Other) => rebuckets.push(ValueChange::Rebucket {
                value_id: value.id,
                quantity: None,
            }),
            None => {}
        }
    }
    deletes.extend(rebuckets);
    deletes
}
