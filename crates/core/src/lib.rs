//! Domain logic for the Lingo translation-management backend.
//!
//! Models, roles, the pluralization engine and the use-case services live
//! here. Storage is reached only through the traits in [`repository`].

pub mod authorization;
pub mod error;
pub mod membership;
pub mod models;
pub mod pluralization;
pub mod quantity;
pub mod repository;
pub mod roles;
pub mod services;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
