//! Built-in validator implementations.
//!
//! This module contains the standard column rules that ship with Colguard.
//! Registration is an explicit static list; nothing registers itself.

mod range;
mod regex;
mod null_check;
mod type_check;
mod custom;

use crate::core::error::RegistryResult;
use crate::validators::registry::ValidatorRegistry;

/// Register all built-in validators.
pub fn register_all(registry: &mut ValidatorRegistry) -> RegistryResult<()> {
    range::register(registry)?;
    regex::register(registry)?;
    null_check::register(registry)?;
    type_check::register(registry)?;
    custom::register(registry)?;
    Ok(())
}

// Re-export for direct access
pub use range::RangeValidator;
pub use regex::RegexValidator;
pub use null_check::NullCheckValidator;
pub use type_check::{ExpectedType, TypeValidator};
pub use custom::CustomFunctionValidator;
