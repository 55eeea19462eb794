//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct mirroring the stored row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO for patches

pub mod group;
pub mod invitation;
pub mod key;
pub mod language;
pub mod membership;
pub mod project;
pub mod value;
