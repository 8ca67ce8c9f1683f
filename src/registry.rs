//! Namespace registry.
//!
//! Maps lowercase namespace prefixes to filesystem roots and keeps the ordered
//! list of model namespaces searched for bare model names. The registry is
//! filled in two guarded phases: framework defaults at bootstrap, application
//! defaults once configuration is available.

use crate::error::{InitPhase, LoadError};
use crate::types::SymbolName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix the framework registers for its own units
pub const FRAMEWORK_PREFIX: &str = "spaark";

/// Namespace holding the framework's models
pub const FRAMEWORK_MODEL_NAMESPACE: &str = "Spaark.Core.Model";

/// Segment appended to the application namespace to form its model namespace
pub const MODEL_SEGMENT: &str = "Model";

/// Order in which model namespaces are searched by `load_model`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPriority {
    /// Application models shadow framework models of the same name
    #[default]
    ApplicationFirst,
    /// Plain registration order: framework first, application second
    RegistrationOrder,
}

/// Where a registry entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Framework,
    Application,
}

/// Prefix → root mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceRoot {
    pub prefix: String,
    pub filesystem_root: PathBuf,
    pub origin: Origin,
}

/// Namespace under which bare model names are tried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNamespace {
    pub namespace: SymbolName,
    pub origin: Origin,
}

impl ModelNamespace {
    /// Full name of `model` inside this namespace
    pub fn qualify(&self, model: &SymbolName) -> SymbolName {
        self.namespace.join(model)
    }
}

/// Framework-side settings used by the bootstrap phase
#[derive(Debug, Clone)]
pub struct FrameworkDefaults {
    pub prefix: String,
    pub root: PathBuf,
    pub model_namespace: SymbolName,
}

impl FrameworkDefaults {
    /// Built-in prefix and model namespace rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: FRAMEWORK_PREFIX.to_string(),
            root: root.into(),
            model_namespace: SymbolName::from_segments(&["Spaark", "Core", "Model"]),
        }
    }

    /// Framework defaults with an overridden prefix and model namespace
    pub fn custom(
        root: impl Into<PathBuf>,
        prefix: &str,
        model_namespace: &str,
    ) -> Result<Self, LoadError> {
        let prefix = SymbolName::parse(prefix)?;
        if prefix.len() != 1 {
            return Err(LoadError::InvalidName(prefix.to_string()));
        }
        Ok(Self {
            prefix: prefix.registry_key(),
            root: root.into(),
            model_namespace: SymbolName::parse(model_namespace)?,
        })
    }
}

/// Registry of namespace roots and model namespaces
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    roots: BTreeMap<String, NamespaceRoot>,
    models: Vec<ModelNamespace>,
    default_root: PathBuf,
    priority: ModelPriority,
    framework_ready: bool,
    application_ready: bool,
}

impl NamespaceRegistry {
    /// Create an empty registry; names with no registered prefix resolve under `default_root`
    pub fn new(default_root: impl Into<PathBuf>) -> Self {
        Self {
            roots: BTreeMap::new(),
            models: Vec::new(),
            default_root: default_root.into(),
            priority: ModelPriority::default(),
            framework_ready: false,
            application_ready: false,
        }
    }

    pub fn with_priority(mut self, priority: ModelPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Register the framework prefix and model namespace. Allowed once.
    pub fn with_framework_defaults(&mut self, defaults: FrameworkDefaults) -> Result<(), LoadError> {
        if self.framework_ready {
            return Err(LoadError::AlreadyInitialized(InitPhase::Framework));
        }

        self.insert_root(&defaults.prefix, defaults.root, Origin::Framework)?;
        self.models.push(ModelNamespace {
            namespace: defaults.model_namespace,
            origin: Origin::Framework,
        });
        self.framework_ready = true;
        Ok(())
    }

    /// Register the application namespace under the default root and append
    /// `<namespace>.Model` to the model namespaces. Allowed once, after the
    /// framework phase.
    ///
    /// `namespace` is expected to be lowercased and trimmed by the caller. Prefix
    /// lookups only ever see the first segment of a name, so the namespace must be
    /// a single segment.
    pub fn with_application_defaults(&mut self, namespace: &str) -> Result<(), LoadError> {
        if !self.framework_ready {
            return Err(LoadError::FrameworkNotInitialized);
        }
        if self.application_ready {
            return Err(LoadError::AlreadyInitialized(InitPhase::Application));
        }

        let namespace = SymbolName::parse(namespace)?;
        if namespace.len() != 1 {
            return Err(LoadError::InvalidName(namespace.to_string()));
        }
        let root = self.default_root.clone();
        self.insert_root(&namespace.to_string(), root, Origin::Application)?;
        self.models.push(ModelNamespace {
            namespace: namespace.child(MODEL_SEGMENT)?,
            origin: Origin::Application,
        });
        self.application_ready = true;
        Ok(())
    }

    fn insert_root(&mut self, prefix: &str, root: PathBuf, origin: Origin) -> Result<(), LoadError> {
        let key = prefix.to_lowercase();
        if self.roots.contains_key(&key) {
            return Err(LoadError::DuplicatePrefix(key));
        }
        debug!(prefix = %key, root = %root.display(), ?origin, "Registered namespace root");
        self.roots.insert(
            key.clone(),
            NamespaceRoot {
                prefix: key,
                filesystem_root: root,
                origin,
            },
        );
        Ok(())
    }

    /// Root registered for a (case-insensitive) prefix
    pub fn root_for(&self, prefix: &str) -> Option<&Path> {
        self.roots
            .get(&prefix.to_lowercase())
            .map(|entry| entry.filesystem_root.as_path())
    }

    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    pub fn priority(&self) -> ModelPriority {
        self.priority
    }

    pub fn is_framework_ready(&self) -> bool {
        self.framework_ready
    }

    pub fn is_application_ready(&self) -> bool {
        self.application_ready
    }

    /// All prefix mappings, ordered by prefix
    pub fn entries(&self) -> impl Iterator<Item = &NamespaceRoot> {
        self.roots.values()
    }

    /// Model namespaces in registration order
    pub fn registered_models(&self) -> &[ModelNamespace] {
        &self.models
    }

    /// Model namespaces in search order
    pub fn model_namespaces(&self) -> Vec<&ModelNamespace> {
        match self.priority {
            ModelPriority::RegistrationOrder => self.models.iter().collect(),
            ModelPriority::ApplicationFirst => {
                let (mut ordered, framework): (Vec<_>, Vec<_>) = self
                    .models
                    .iter()
                    .partition(|m| m.origin == Origin::Application);
                ordered.extend(framework);
                ordered
            }
        }
    }
}
