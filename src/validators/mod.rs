//! Validator module.
//!
//! Contains the validator registry and built-in validator implementations.

pub mod registry;
pub mod builtin;

pub use registry::{global, install_global, RegistryBuilder, ValidatorFactory, ValidatorRegistry};
