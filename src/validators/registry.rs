//! Validator registry for managing available validator types.

use crate::core::error::{ParameterError, RegistryError, RegistryResult};
use crate::core::param::{Parameters, ResolvedParams};
use crate::core::validator::{ConfigurableValidator, Validator, ValidatorDescriptor};
use indexmap::IndexMap;
use log::debug;
use std::sync::{Arc, OnceLock};

/// Factory function for creating configured validator instances.
///
/// Receives parameters that already passed the descriptor's schema.
pub type ValidatorFactory =
    Arc<dyn Fn(&ResolvedParams) -> Result<Box<dyn Validator>, ParameterError> + Send + Sync>;

/// Registry entry containing descriptor and factory.
#[derive(Clone)]
struct RegistryEntry {
    factory: ValidatorFactory,
    descriptor: ValidatorDescriptor,
}

/// Registry for all available validator types.
///
/// Names are unique: registering a name twice is an error, never an
/// override. Lookups never mutate the registry, so one instance can be
/// shared by pipelines on many threads once registration is finished.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    /// Validators indexed by name, in registration order.
    validators: IndexMap<String, RegistryEntry>,
}

static GLOBAL: OnceLock<ValidatorRegistry> = OnceLock::new();

/// The process-wide registry.
///
/// Installs the built-in validators on first use unless `install_global`
/// ran before.
pub fn global() -> &'static ValidatorRegistry {
    GLOBAL.get_or_init(ValidatorRegistry::with_builtins)
}

/// Install a custom process-wide registry.
///
/// Must run before the first call to `global()`; the installed registry is
/// immutable afterwards.
pub fn install_global(registry: ValidatorRegistry) -> RegistryResult<&'static ValidatorRegistry> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    Ok(global())
}

impl ValidatorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let result = crate::validators::builtin::register_all(&mut registry);
        debug_assert!(result.is_ok(), "built-in validator names collide: {:?}", result);
        registry
    }

    /// Register a validator type under its descriptor name.
    pub fn register<F>(&mut self, descriptor: ValidatorDescriptor, factory: F) -> RegistryResult<()>
    where
        F: Fn(&ResolvedParams) -> Result<Box<dyn Validator>, ParameterError>
            + Send
            + Sync
            + 'static,
    {
        let name = descriptor.name.clone();
        if self.validators.contains_key(&name) {
            return Err(RegistryError::DuplicateRegistration { name });
        }

        debug!(
            "Registering validator '{}' ({} parameters)",
            name,
            descriptor.parameters.len()
        );
        self.validators.insert(
            name,
            RegistryEntry {
                factory: Arc::new(factory),
                descriptor,
            },
        );
        Ok(())
    }

    /// Register a validator type that builds itself from parameters.
    pub fn register_type<V: ConfigurableValidator>(&mut self) -> RegistryResult<()> {
        self.register(V::descriptor(), |params| {
            V::from_params(params).map(|v| Box::new(v) as Box<dyn Validator>)
        })
    }

    /// Create a configured validator instance by name.
    ///
    /// The parameter schema is checked here, before the factory runs.
    pub fn create(&self, name: &str, params: &Parameters) -> RegistryResult<Box<dyn Validator>> {
        let entry = self
            .validators
            .get(name)
            .ok_or_else(|| RegistryError::UnknownValidator {
                name: name.to_string(),
                available: self.names().map(String::from).collect(),
            })?;

        ResolvedParams::resolve(&entry.descriptor.parameters, params)
            .and_then(|resolved| (entry.factory)(&resolved))
            .map_err(|source| RegistryError::InvalidParameters {
                validator: name.to_string(),
                source,
            })
    }

    /// Get the descriptor for a validator without creating an instance.
    pub fn descriptor(&self, name: &str) -> Option<&ValidatorDescriptor> {
        self.validators.get(name).map(|e| &e.descriptor)
    }

    /// Check if a validator is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Get all registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(|s| s.as_str())
    }

    /// Get all descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ValidatorDescriptor> {
        self.validators.values().map(|e| &e.descriptor)
    }

    /// Search validators by name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.validators
            .iter()
            .filter(|(_, entry)| {
                let d = &entry.descriptor;
                d.name.to_lowercase().contains(&query)
                    || d.description.to_lowercase().contains(&query)
                    || d.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Get the total number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Builder for creating a customized registry.
pub struct RegistryBuilder {
    registry: ValidatorRegistry,
    include_builtins: bool,
    error: Option<RegistryError>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: ValidatorRegistry::new(),
            include_builtins: true,
            error: None,
        }
    }

    /// Include or exclude built-in validators.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a custom validator type.
    pub fn register_type<V: ConfigurableValidator>(mut self) -> Self {
        if self.error.is_none() {
            self.error = self.registry.register_type::<V>().err();
        }
        self
    }

    /// Register a custom validator with an explicit factory.
    pub fn register<F>(mut self, descriptor: ValidatorDescriptor, factory: F) -> Self
    where
        F: Fn(&ResolvedParams) -> Result<Box<dyn Validator>, ParameterError>
            + Send
            + Sync
            + 'static,
    {
        if self.error.is_none() {
            self.error = self.registry.register(descriptor, factory).err();
        }
        self
    }

    /// Build the registry.
    ///
    /// Fails with the first duplicate name, including clashes between
    /// custom validators and built-ins.
    pub fn build(self) -> RegistryResult<ValidatorRegistry> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.include_builtins {
            return Ok(self.registry);
        }

        let mut registry = ValidatorRegistry::new();
        crate::validators::builtin::register_all(&mut registry)?;
        for (name, entry) in self.registry.validators {
            if registry.contains(&name) {
                return Err(RegistryError::DuplicateRegistration { name });
            }
            registry.validators.insert(name, entry);
        }
        Ok(registry)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
