//! Translation value model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::quantity::QuantityBucket;
use crate::types::DbId;

/// Constraint names reported when a value insert is rejected.
pub const KEY_FK: &str = "translation_values_key_id_fkey";
pub const LANGUAGE_FK: &str = "translation_values_language_id_fkey";
pub const QUANTITY_CHECK: &str = "ck_translation_values_quantity";

/// The text of one key in one language for one quantity bucket.
///
/// `quantity` is `None` for singular keys and one of ZERO/ONE/OTHER for
/// plural keys. `(key_id, language_id, quantity)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationValue {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "quantity_string")]
    pub quantity: Option<QuantityBucket>,
    pub key_id: DbId,
    pub language_id: DbId,
}

/// DTO for creating a value. An omitted quantity is treated as singular.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateValue {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "quantity_string")]
    pub quantity: Option<QuantityBucket>,
    pub language_id: DbId,
}

/// DTO for updating a value. Only the content is mutable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateValue {
    pub name: String,
}

/// Insert payload for the value repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewValue {
    pub key_id: DbId,
    pub language_id: DbId,
    pub quantity: Option<QuantityBucket>,
    pub name: String,
}
