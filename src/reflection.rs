//! Reflection over loaded units.
//!
//! Controller dispatch only needs two answers from a unit: whether it exposes a
//! public method with a given name, and the declaration of that method.

use crate::error::LoadError;
use crate::loader::ClassLoader;
use crate::types::SymbolName;
use crate::unit::{MethodDecl, UnitDescriptor};

/// Read-only view of a loaded unit and its ancestry
pub struct UnitReflector<'a> {
    loader: &'a ClassLoader,
    unit: &'a UnitDescriptor,
}

impl<'a> UnitReflector<'a> {
    /// Reflect on a unit that is already loaded
    pub fn of(loader: &'a ClassLoader, name: &str) -> Option<Self> {
        loader.unit(name).map(|unit| Self { loader, unit })
    }

    pub fn name(&self) -> &SymbolName {
        &self.unit.name
    }

    pub fn descriptor(&self) -> &UnitDescriptor {
        self.unit
    }

    /// Declaration of `method` on the unit or one of its ancestors
    pub fn method(&self, method: &str) -> Option<&'a MethodDecl> {
        self.loader
            .symbols()
            .find_method(&self.unit.name, method)
            .map(|(_, decl)| decl)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.method(method).is_some()
    }

    pub fn has_public_method(&self, method: &str) -> bool {
        self.method(method).map(|m| m.is_public()).unwrap_or(false)
    }

    /// Public methods, own declarations first, then inherited ones not overridden
    pub fn public_methods(&self) -> Vec<&'a MethodDecl> {
        let symbols = self.loader.symbols();
        let mut seen: Vec<String> = Vec::new();
        let mut methods = Vec::new();
        let mut pending: Vec<&SymbolName> = vec![&self.unit.name];
        let mut visited: Vec<String> = Vec::new();

        while let Some(name) = pending.pop() {
            let key = name.lookup_key();
            if visited.contains(&key) {
                continue;
            }
            visited.push(key);
            let unit = match symbols.get(name) {
                Some(unit) => unit,
                None => continue,
            };
            for method in &unit.methods {
                let lowered = method.name.to_lowercase();
                if seen.contains(&lowered) {
                    continue;
                }
                seen.push(lowered);
                if method.is_public() {
                    methods.push(method);
                }
            }
            let ancestors: Vec<&SymbolName> = unit.ancestors().collect();
            pending.extend(ancestors.into_iter().rev());
        }
        methods
    }
}

/// Load `controller` and return its public, non-static `action`.
///
/// `Ok(None)` covers both a controller that cannot be found and one that does
/// not expose the action.
pub fn resolve_action(
    loader: &mut ClassLoader,
    controller: &str,
    action: &str,
) -> Result<Option<MethodDecl>, LoadError> {
    if !loader.load(controller)? {
        return Ok(None);
    }
    let reflector = match UnitReflector::of(loader, controller) {
        Some(reflector) => reflector,
        None => return Ok(None),
    };
    Ok(reflector
        .method(action)
        .filter(|m| m.is_public() && !m.is_static)
        .cloned())
}
