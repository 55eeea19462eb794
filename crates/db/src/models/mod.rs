//! Row structs read with `sqlx::FromRow`.
//!
//! Roles and quantity buckets are stored as TEXT; rows holding them are
//! converted with `TryFrom` so an unknown value surfaces as a storage error
//! instead of a panic. The other rows convert infallibly.

pub mod group;
pub mod invitation;
pub mod key;
pub mod language;
pub mod membership;
pub mod project;
pub mod value;
