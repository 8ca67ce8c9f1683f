//! Class loader
//!
//! Turns symbolic names into loaded, verified units:
//!
//! 1. a symbol-table hit returns immediately, without touching the source;
//! 2. the name's first segment picks a registered root (or the default root) and
//!    the remaining segments, lowercased, give the unit file path;
//! 3. the file is included once and must declare the requested unit;
//! 4. failing that, the parent unit's file (`dirname(path)` + suffix) is tried,
//!    for files that group several units under one holder unit.
//!
//! A name that cannot be found is `Ok(false)`; files that exist but break the
//! loading rules are errors.

use crate::error::LoadError;
use crate::hooks::HookRegistry;
use crate::registry::{FrameworkDefaults, NamespaceRegistry};
use crate::source::UnitSource;
use crate::symbols::{Autoload, SymbolTable};
use crate::types::{parent_unit_file_path, unit_file_path, SymbolName};
use crate::unit::{UnitDescriptor, UnitFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix appended to the derived path of every unit file
pub const DEFAULT_FILE_SUFFIX: &str = ".unit.toml";

/// Result of probing one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Loaded,
    NotFound,
    DefinitionMismatch,
    Deprecated,
}

/// One candidate file probed while resolving a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionAttempt {
    pub name: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Resolves and loads units through a namespace registry
pub struct ClassLoader {
    registry: NamespaceRegistry,
    symbols: SymbolTable,
    hooks: HookRegistry,
    source: Box<dyn UnitSource>,
    file_suffix: String,
    attempts: Vec<ResolutionAttempt>,
}

impl ClassLoader {
    /// Create a loader over an already prepared registry
    pub fn new(registry: NamespaceRegistry, source: impl UnitSource + 'static) -> Self {
        Self {
            registry,
            symbols: SymbolTable::new(),
            hooks: HookRegistry::new(),
            source: Box::new(source),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            attempts: Vec::new(),
        }
    }

    /// Bootstrap phase: a registry rooted at `default_root` with the framework
    /// defaults registered. Application defaults follow once configuration is
    /// loaded, see [`ClassLoader::with_application_defaults`].
    pub fn bootstrap(
        registry: NamespaceRegistry,
        framework: FrameworkDefaults,
        source: impl UnitSource + 'static,
    ) -> Result<Self, LoadError> {
        let mut registry = registry;
        registry.with_framework_defaults(framework)?;
        Ok(Self::new(registry, source))
    }

    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Post-configuration phase: register the application namespace
    pub fn with_application_defaults(&mut self, namespace: &str) -> Result<(), LoadError> {
        self.registry.with_application_defaults(namespace)
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn file_suffix(&self) -> &str {
        &self.file_suffix
    }

    /// Bind the on-load hook body for a unit
    pub fn bind_on_load<F>(&mut self, unit: &str, hook: F) -> Result<(), LoadError>
    where
        F: FnMut(&UnitDescriptor) -> anyhow::Result<()> + Send + 'static,
    {
        let name = SymbolName::parse(unit)?;
        self.hooks.bind(&name, hook);
        Ok(())
    }

    /// Candidate files probed by the most recent `resolve`, `load` or `load_model` call
    pub fn last_attempts(&self) -> &[ResolutionAttempt] {
        &self.attempts
    }

    /// Whether `name` is already loaded. Never touches the source.
    pub fn exists(&self, name: &str) -> bool {
        SymbolName::parse(name)
            .map(|n| self.symbols.contains(&n))
            .unwrap_or(false)
    }

    /// Descriptor of a loaded unit
    pub fn unit(&self, name: &str) -> Option<&UnitDescriptor> {
        SymbolName::parse(name)
            .ok()
            .and_then(|n| self.symbols.get(&n))
    }

    /// Unit file path derived for `name`
    pub fn candidate_path(&self, name: &SymbolName) -> PathBuf {
        match self.registry.root_for(&name.registry_key()) {
            Some(root) => unit_file_path(root, &name.relative_path(1), &self.file_suffix),
            None => unit_file_path(
                self.registry.default_root(),
                &name.relative_path(0),
                &self.file_suffix,
            ),
        }
    }

    /// Load `name` unless it is already loaded.
    pub fn load(&mut self, name: &str) -> Result<bool, LoadError> {
        let name = SymbolName::parse(name)?;
        if self.symbols.contains(&name) {
            return self.check_loaded(&name);
        }
        self.attempts.clear();
        self.resolve_symbol(&name)
    }

    /// Resolve `name` through the registry, with the parent-unit fallback.
    pub fn resolve(&mut self, name: &str) -> Result<bool, LoadError> {
        let name = SymbolName::parse(name)?;
        self.attempts.clear();
        self.resolve_symbol(&name)
    }

    /// Resolve a model name, trying `local_scope` first and then every model
    /// namespace in search order. Returns the full name that resolved.
    pub fn load_model(
        &mut self,
        name: &str,
        local_scope: Option<&str>,
    ) -> Result<Option<SymbolName>, LoadError> {
        let model = SymbolName::parse(name)?;

        let mut candidates = Vec::new();
        if let Some(scope) = local_scope.filter(|s| !s.trim().is_empty()) {
            candidates.push(SymbolName::parse(scope)?.join(&model));
        }
        candidates.extend(
            self.registry
                .model_namespaces()
                .into_iter()
                .map(|ns| ns.qualify(&model)),
        );

        self.attempts.clear();
        for candidate in candidates {
            if self.resolve_symbol(&candidate)? {
                debug!(model = %model, resolved = %candidate, "Resolved model");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn resolve_symbol(&mut self, name: &SymbolName) -> Result<bool, LoadError> {
        if self.symbols.contains(name) {
            return self.check_loaded(name);
        }

        let path = self.candidate_path(name);
        if self.load_and_verify(&path, name)? {
            return Ok(true);
        }

        let (parent, parent_path) = match (
            name.parent(),
            parent_unit_file_path(&path, &self.file_suffix),
        ) {
            (Some(parent), Some(parent_path)) => (parent, parent_path),
            _ => return Ok(false),
        };

        if self.load_and_verify(&parent_path, &parent)? && self.symbols.contains(name) {
            debug!(name = %name, holder = %parent, "Resolved through holder unit");
            return Ok(true);
        }

        debug!(name = %name, "Unit not found");
        Ok(false)
    }

    /// Fast path for names already in the symbol table
    fn check_loaded(&self, name: &SymbolName) -> Result<bool, LoadError> {
        match self.symbols.deprecation_source(name) {
            Some(marked) => Err(LoadError::Deprecated {
                name: name.to_string(),
                marked_by: marked.name.to_string(),
            }),
            None => Ok(true),
        }
    }

    /// Include the unit file at `path` and verify it declared `expected`.
    ///
    /// A missing file is `Ok(false)`. A file that does not declare `expected`
    /// fails with `DefinitionMismatch`; a unit carrying the deprecated marker
    /// (itself or through an ancestor) fails with `Deprecated`. On success the
    /// unit's on-load hook runs, once per unit.
    pub fn load_and_verify(&mut self, path: &Path, expected: &SymbolName) -> Result<bool, LoadError> {
        if !self.source.exists(path) {
            self.record(expected, path, Outcome::NotFound);
            return Ok(false);
        }

        self.include(path)?;

        if !self.symbols.contains(expected) {
            self.record(expected, path, Outcome::DefinitionMismatch);
            return Err(LoadError::DefinitionMismatch {
                name: expected.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(marked) = self.symbols.deprecation_source(expected) {
            let marked_by = marked.name.to_string();
            self.record(expected, path, Outcome::Deprecated);
            return Err(LoadError::Deprecated {
                name: expected.to_string(),
                marked_by,
            });
        }

        self.run_on_load_hook(expected)?;
        self.record(expected, path, Outcome::Loaded);
        Ok(true)
    }

    /// Parse and declare every unit in `path`, at most once per path.
    fn include(&mut self, path: &Path) -> Result<(), LoadError> {
        if !self.symbols.mark_included(path) {
            return Ok(());
        }

        let content = self.source.read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let units = UnitFile::parse(path, &content)?.into_descriptors(path)?;

        for (unit, ancestor) in self.symbols.unresolved_ancestors(&units) {
            if self.symbols.contains(&ancestor) {
                continue;
            }
            if !self.autoload(&ancestor)? {
                return Err(LoadError::MissingAncestor {
                    name: unit.to_string(),
                    ancestor: ancestor.to_string(),
                });
            }
        }

        let count = units.len();
        self.symbols.declare_all(units)?;
        info!(path = %path.display(), units = count, "Included unit file");
        Ok(())
    }

    fn run_on_load_hook(&mut self, name: &SymbolName) -> Result<(), LoadError> {
        let has_hook = self
            .symbols
            .get(name)
            .map(|unit| unit.has_on_load_hook())
            .unwrap_or(false);
        if !has_hook || !self.symbols.mark_initialized(name) {
            return Ok(());
        }

        let unit = match self.symbols.get(name) {
            Some(unit) => unit,
            None => return Ok(()),
        };
        match self.hooks.invoke(unit) {
            Some(Ok(())) => {
                debug!(unit = %unit.name, "Ran on-load hook");
                Ok(())
            }
            Some(Err(source)) => Err(LoadError::Hook {
                name: unit.name.to_string(),
                source,
            }),
            None => {
                warn!(
                    unit = %unit.name,
                    method = %unit.on_load_method_name(),
                    "Unit declares an on-load hook but none is bound"
                );
                Ok(())
            }
        }
    }

    fn record(&mut self, name: &SymbolName, path: &Path, outcome: Outcome) {
        debug!(name = %name, path = %path.display(), ?outcome, "Resolution attempt");
        self.attempts.push(ResolutionAttempt {
            name: name.to_string(),
            path: path.to_path_buf(),
            outcome,
        });
    }
}

impl Autoload for ClassLoader {
    fn autoload(&mut self, name: &SymbolName) -> Result<bool, LoadError> {
        self.resolve_symbol(name)
    }
}

impl std::fmt::Debug for ClassLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassLoader")
            .field("registry", &self.registry)
            .field("loaded", &self.symbols.len())
            .field("hooks", &self.hooks)
            .field("file_suffix", &self.file_suffix)
            .finish()
    }
}
