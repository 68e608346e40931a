//! # Yatube Core
//!
//! The domain layer of the Yatube API: entities, repository ports,
//! authorization policies and the resource services built on top of them.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use permissions::{Access, Caller, Policy};
pub use validation::FieldErrors;
