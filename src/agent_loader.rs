//! Declarative agent descriptors and their resolution into policies.
//!
//! An [`AgentDescriptor`] is the on-disk YAML description of an agent: which
//! module and entry point implement it, plus a free-form configuration map
//! handed through untouched. Descriptors are resolved through a
//! [`PolicyRegistry`] of named factories registered once at setup; the rest
//! of the crate depends only on the resulting [`Policy`] objects and never on
//! the resolution mechanism.
//!
//! A descriptor naming an unknown factory is a configuration error and is
//! surfaced before any match starts.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::action_loop::Policy;
use crate::error::EnvError;

/// Declarative description of one agent, typically loaded from YAML.
///
/// ```yaml
/// module: my_agents
/// entry: GrabBot
/// config:
///   aggression: "0.7"
///   model_path: "weights/grab_bot.bin"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AgentDescriptor {
    /// Factory namespace the agent lives in.
    pub module: String,
    /// Entry point within the module.
    pub entry: String,
    /// Free-form configuration, passed through to the factory unvalidated.
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

impl AgentDescriptor {
    /// Load a descriptor from a YAML file.
    ///
    /// # Errors
    /// [`EnvError::Configuration`] when the file is missing or not a valid
    /// descriptor.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EnvError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse a descriptor from a YAML string.
    pub fn from_yaml(raw: &str) -> Result<Self, EnvError> {
        serde_yaml::from_str(raw)
            .map_err(|e| EnvError::Configuration(format!("invalid agent descriptor: {e}")))
    }

    fn key(&self) -> String {
        format!("{}::{}", self.module, self.entry)
    }
}

/// Builds a policy for one slot from a resolved descriptor.
pub trait PolicyFactory {
    /// Instantiate the policy for the given 1-based slot number.
    ///
    /// Configuration validation is the factory's responsibility; errors here
    /// are fatal and reported before a match starts.
    fn build(&self, slot: u8, descriptor: &AgentDescriptor) -> anyhow::Result<Box<dyn Policy>>;
}

/// Named policy factories, registered once at setup.
#[derive(Default)]
pub struct PolicyRegistry {
    factories: HashMap<String, Box<dyn PolicyFactory>>,
}

impl PolicyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `module::entry`.
    pub fn register(
        &mut self,
        module: &str,
        entry: &str,
        factory: Box<dyn PolicyFactory>,
    ) -> &mut Self {
        self.factories.insert(format!("{module}::{entry}"), factory);
        self
    }

    /// Resolve a descriptor into a policy for the given 1-based slot.
    ///
    /// # Errors
    /// [`EnvError::Configuration`] when no factory matches the descriptor or
    /// the factory rejects its configuration.
    pub fn resolve(
        &self,
        slot: u8,
        descriptor: &AgentDescriptor,
    ) -> Result<Box<dyn Policy>, EnvError> {
        let key = descriptor.key();
        let factory = self.factories.get(&key).ok_or_else(|| {
            EnvError::Configuration(format!("no policy factory registered for '{key}'"))
        })?;
        let policy = factory
            .build(slot, descriptor)
            .map_err(|e| EnvError::Configuration(format!("factory '{key}' failed: {e:#}")))?;
        info!(slot, %key, "policy resolved");
        Ok(policy)
    }
}
