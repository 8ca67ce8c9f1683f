//! Unit files
//!
//! A unit file is a TOML descriptor declaring one or more units (classes or
//! interfaces) with their ancestry, constants and methods. Including a unit file
//! means parsing it and declaring every unit it contains.
//!
//! ```toml
//! namespace = "Spaark.Core.Output"
//!
//! [[unit]]
//! name = "StdOutput"
//! extends = "Spaark.Core.Base.Controller"
//!
//! [[unit.methods]]
//! name = "page"
//! ```

use crate::error::LoadError;
use crate::types::SymbolName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Constant name that marks a unit (and everything extending it) as deprecated
pub const DEPRECATED_CONSTANT: &str = "DEPRECATED";

/// Suffix of the conventional on-load hook method: `<Trailing>_onload`
pub const ON_LOAD_SUFFIX: &str = "_onload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    #[default]
    Class,
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Method declared by a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

impl MethodDecl {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Raw `[[unit]]` table as written in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDecl {
    pub name: String,
    #[serde(default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub constants: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// Parsed unit file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitFile {
    /// Namespace prepended to every unit name in the file
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitDecl>,
}

impl UnitFile {
    /// Parse the contents of the unit file at `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self, LoadError> {
        toml::from_str(content).map_err(|e| LoadError::MalformedUnitFile {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Qualify every declared unit into a descriptor.
    ///
    /// Unit names are relative to the file namespace; `extends` and `implements`
    /// references are always fully qualified.
    pub fn into_descriptors(self, path: &Path) -> Result<Vec<UnitDescriptor>, LoadError> {
        let malformed = |message: String| LoadError::MalformedUnitFile {
            path: path.to_path_buf(),
            message,
        };

        let namespace = match &self.namespace {
            Some(ns) => Some(
                SymbolName::parse(ns).map_err(|_| malformed(format!("invalid namespace {:?}", ns)))?,
            ),
            None => None,
        };
        let qualify = |raw: &str| -> Result<SymbolName, LoadError> {
            SymbolName::parse(raw).map_err(|_| malformed(format!("invalid unit name {:?}", raw)))
        };

        self.units
            .into_iter()
            .map(|decl| {
                let local = qualify(&decl.name)?;
                let name = match &namespace {
                    Some(ns) => ns.join(&local),
                    None => local,
                };
                let parent = decl.extends.as_deref().map(|raw| qualify(raw)).transpose()?;
                let interfaces = decl
                    .implements
                    .iter()
                    .map(|raw| qualify(raw))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(UnitDescriptor {
                    name,
                    kind: decl.kind,
                    parent,
                    interfaces,
                    deprecated: decl.deprecated,
                    constants: decl.constants,
                    methods: decl.methods,
                    source: path.to_path_buf(),
                })
            })
            .collect()
    }
}

/// A declared unit with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub name: SymbolName,
    pub kind: UnitKind,
    pub parent: Option<SymbolName>,
    pub interfaces: Vec<SymbolName>,
    pub deprecated: bool,
    pub constants: BTreeMap<String, toml::Value>,
    pub methods: Vec<MethodDecl>,
    /// File the unit was declared in
    pub source: PathBuf,
}

impl UnitDescriptor {
    /// Whether this unit itself carries the deprecated marker
    pub fn is_marked_deprecated(&self) -> bool {
        self.deprecated || self.constants.contains_key(DEPRECATED_CONSTANT)
    }

    /// Method declared directly on this unit (case-insensitive)
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Parent first, then interfaces in declaration order
    pub fn ancestors(&self) -> impl Iterator<Item = &SymbolName> {
        self.parent.iter().chain(self.interfaces.iter())
    }

    /// Name of the on-load hook method this unit would declare
    pub fn on_load_method_name(&self) -> String {
        format!("{}{}", self.name.trailing_segment(), ON_LOAD_SUFFIX)
    }

    /// Whether the unit declares an on-load hook, static or not
    pub fn has_on_load_hook(&self) -> bool {
        self.method(&self.on_load_method_name()).is_some()
    }
}
