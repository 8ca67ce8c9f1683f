//! Unit catalog
//!
//! Walks every registered root, maps each unit file back to the symbolic name
//! its path implies, and can validate the whole tree by loading every entry.

use crate::error::LoadError;
use crate::loader::ClassLoader;
use crate::registry::NamespaceRegistry;
use crate::types::{is_identifier, SymbolName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A unit file and the name its location implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub name: SymbolName,
    /// Unprefixed name, for files under a prefix root that is also the
    /// default root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<SymbolName>,
}

/// All unit files reachable from the registry's roots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub entries: Vec<CatalogEntry>,
    /// Files with the unit suffix whose path is not a valid symbolic name
    pub skipped: Vec<PathBuf>,
}

impl UnitCatalog {
    /// Scan the registered roots and the default root.
    ///
    /// Nested roots are walked first, so a file is attributed to the most
    /// specific prefix that contains it.
    pub fn scan(registry: &NamespaceRegistry, suffix: &str) -> Self {
        let mut roots: Vec<(Option<String>, PathBuf)> = registry
            .entries()
            .map(|entry| (Some(entry.prefix.clone()), entry.filesystem_root.clone()))
            .collect();
        if !roots.iter().any(|(_, root)| root == registry.default_root()) {
            roots.push((None, registry.default_root().to_path_buf()));
        }

        let mut roots: Vec<(Option<String>, PathBuf)> = roots
            .into_iter()
            .filter_map(|(prefix, root)| match dunce::canonicalize(&root) {
                Ok(canonical) => Some((prefix, canonical)),
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Skipping unreadable root");
                    None
                }
            })
            .collect();
        roots.sort_by_key(|(_, root)| std::cmp::Reverse(root.components().count()));
        let default_root = dunce::canonicalize(registry.default_root()).ok();

        let mut catalog = UnitCatalog::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        for (prefix, root) in &roots {
            let shares_default = prefix.is_some() && default_root.as_ref() == Some(root);
            for entry in WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                        None
                    }
                })
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                let relative = match path.strip_prefix(root) {
                    Ok(relative) => relative,
                    Err(_) => continue,
                };
                if !relative.to_string_lossy().ends_with(suffix) || !seen.insert(path.to_path_buf()) {
                    continue;
                }
                match name_for(prefix.as_deref(), relative, suffix) {
                    Some(name) => {
                        debug!(path = %path.display(), name = %name, "Catalogued unit file");
                        let alternative = if shares_default {
                            name_for(None, relative, suffix)
                        } else {
                            None
                        };
                        catalog.entries.push(CatalogEntry {
                            path: path.to_path_buf(),
                            name,
                            alternative,
                        });
                    }
                    None => catalog.skipped.push(path.to_path_buf()),
                }
            }
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every catalogued name and report how it went.
    ///
    /// An entry whose prefixed name is missing or not declared by its file is
    /// retried under its unprefixed name, and reported under that name when the
    /// retry loads.
    pub fn validate(&self, loader: &mut ClassLoader) -> ValidationReport {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let status = load_status(loader, &entry.name);
                let retry = matches!(status, UnitStatus::NotFound | UnitStatus::DefinitionMismatch);
                if let (true, Some(alternative)) = (retry, &entry.alternative) {
                    if load_status(loader, alternative).is_ok() {
                        return ValidationEntry {
                            path: entry.path.clone(),
                            name: alternative.to_string(),
                            status: UnitStatus::Loaded,
                        };
                    }
                }
                ValidationEntry {
                    path: entry.path.clone(),
                    name: entry.name.to_string(),
                    status,
                }
            })
            .collect();
        ValidationReport {
            entries,
            skipped: self.skipped.clone(),
        }
    }
}

fn load_status(loader: &mut ClassLoader, name: &SymbolName) -> UnitStatus {
    match loader.load(&name.to_string()) {
        Ok(true) => UnitStatus::Loaded,
        Ok(false) => UnitStatus::NotFound,
        Err(LoadError::DefinitionMismatch { .. }) => UnitStatus::DefinitionMismatch,
        Err(LoadError::Deprecated { marked_by, .. }) => UnitStatus::Deprecated { marked_by },
        Err(e) => UnitStatus::Error {
            message: e.to_string(),
        },
    }
}

/// Symbolic name implied by a unit file path relative to its root.
///
/// Every path component must be an identifier on its own; `user.old.unit.toml`
/// has no name.
fn name_for(prefix: Option<&str>, relative: &Path, suffix: &str) -> Option<SymbolName> {
    let rendered = relative.to_string_lossy();
    let stem = rendered.strip_suffix(suffix)?;
    let mut segments: Vec<String> = prefix.map(str::to_string).into_iter().collect();
    for component in Path::new(stem).components() {
        let segment = component.as_os_str().to_string_lossy();
        if !is_identifier(&segment) {
            return None;
        }
        segments.push(segment.into_owned());
    }
    if segments.is_empty() {
        return None;
    }
    SymbolName::parse(&segments.join(".")).ok()
}

/// Outcome of loading one catalogued unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitStatus {
    Loaded,
    NotFound,
    DefinitionMismatch,
    Deprecated { marked_by: String },
    Error { message: String },
}

impl UnitStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, UnitStatus::Loaded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitStatus::Loaded => "loaded",
            UnitStatus::NotFound => "not found",
            UnitStatus::DefinitionMismatch => "not declared in its file",
            UnitStatus::Deprecated { .. } => "deprecated",
            UnitStatus::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub path: PathBuf,
    pub name: String,
    #[serde(flatten)]
    pub status: UnitStatus,
}

/// Result of validating a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
    pub skipped: Vec<PathBuf>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.iter().filter(|e| !e.status.is_ok())
    }
}
