//! Loaded-symbol table
//!
//! Every unit that has ever been declared stays resolvable for the lifetime of
//! the table. The table is append-only: there is no unload and no redeclare.
//! Lookups are ASCII case-insensitive, declared spelling is preserved.

use crate::error::LoadError;
use crate::types::SymbolName;
use crate::unit::{MethodDecl, UnitDescriptor};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Callback invoked whenever a reference to an unresolved name is encountered.
///
/// Returns whether the name could be resolved; an ordinary miss is `Ok(false)`.
pub trait Autoload {
    fn autoload(&mut self, name: &SymbolName) -> Result<bool, LoadError>;
}

/// Table of declared units and included unit files
#[derive(Debug, Default)]
pub struct SymbolTable {
    units: HashMap<String, UnitDescriptor>,
    declaration_order: Vec<String>,
    included: HashSet<PathBuf>,
    initialized: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &SymbolName) -> bool {
        self.units.contains_key(&name.lookup_key())
    }

    pub fn get(&self, name: &SymbolName) -> Option<&UnitDescriptor> {
        self.units.get(&name.lookup_key())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Declared units in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &UnitDescriptor> {
        self.declaration_order
            .iter()
            .filter_map(move |key| self.units.get(key))
    }

    pub fn is_included(&self, path: &Path) -> bool {
        self.included.contains(path)
    }

    /// Record that `path` has been included; false if it already was
    pub(crate) fn mark_included(&mut self, path: &Path) -> bool {
        self.included.insert(path.to_path_buf())
    }

    /// Record that the on-load hook for `name` ran; false if it already had
    pub(crate) fn mark_initialized(&mut self, name: &SymbolName) -> bool {
        self.initialized.insert(name.lookup_key())
    }

    pub fn is_initialized(&self, name: &SymbolName) -> bool {
        self.initialized.contains(&name.lookup_key())
    }

    /// Declare every unit of one file, or none of them.
    pub(crate) fn declare_all(&mut self, units: Vec<UnitDescriptor>) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for unit in &units {
            let key = unit.name.lookup_key();
            if self.units.contains_key(&key) || !seen.insert(key) {
                return Err(LoadError::Redeclared {
                    name: unit.name.to_string(),
                    path: unit.source.clone(),
                });
            }
        }

        for unit in units {
            let key = unit.name.lookup_key();
            self.declaration_order.push(key.clone());
            self.units.insert(key, unit);
        }
        Ok(())
    }

    /// Ancestors referenced by `units` that are neither declared yet nor
    /// declared by `units` themselves, as `(unit, ancestor)` pairs.
    pub fn unresolved_ancestors(&self, units: &[UnitDescriptor]) -> Vec<(SymbolName, SymbolName)> {
        let local: HashSet<String> = units.iter().map(|u| u.name.lookup_key()).collect();
        units
            .iter()
            .flat_map(|unit| {
                unit.ancestors()
                    .filter(|a| !local.contains(&a.lookup_key()) && !self.contains(a))
                    .map(move |a| (unit.name.clone(), a.clone()))
            })
            .collect()
    }

    /// First unit in the ancestry of `name` (itself included) carrying the
    /// deprecated marker.
    pub fn deprecation_source(&self, name: &SymbolName) -> Option<&UnitDescriptor> {
        self.lineage(name).find(|unit| unit.is_marked_deprecated())
    }

    /// Resolve `method` on `name` or, failing that, on its ancestors
    pub fn find_method(&self, name: &SymbolName, method: &str) -> Option<(&UnitDescriptor, &MethodDecl)> {
        self.lineage(name)
            .find_map(|unit| unit.method(method).map(|m| (unit, m)))
    }

    /// Breadth-first walk over a unit and its declared ancestors
    fn lineage<'a>(&'a self, name: &SymbolName) -> impl Iterator<Item = &'a UnitDescriptor> + 'a {
        let mut queue: VecDeque<String> = VecDeque::from([name.lookup_key()]);
        let mut visited: HashSet<String> = HashSet::new();

        std::iter::from_fn(move || {
            while let Some(key) = queue.pop_front() {
                if !visited.insert(key.clone()) {
                    continue;
                }
                if let Some(unit) = self.units.get(&key) {
                    queue.extend(unit.ancestors().map(|a| a.lookup_key()));
                    return Some(unit);
                }
            }
            None
        })
    }
}
