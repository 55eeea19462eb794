//! HTTP handlers. Each handler authenticates through [`AuthUser`], calls one
//! core service with the request's repositories and maps the outcome to a
//! status code.
//!
//! [`AuthUser`]: crate::middleware::auth::AuthUser

pub mod group;
pub mod invitation;
pub mod key;
pub mod language;
pub mod member;
pub mod project;
pub mod value;
