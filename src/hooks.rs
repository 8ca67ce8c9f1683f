//! On-load hook bindings.
//!
//! A unit advertises an on-load hook by declaring a static `<Trailing>_onload`
//! method. The body of that method is a closure the host binds here by unit
//! name.

use crate::types::SymbolName;
use crate::unit::UnitDescriptor;
use std::collections::HashMap;
use std::fmt;

/// Body of an on-load hook
pub type OnLoadFn = Box<dyn FnMut(&UnitDescriptor) -> anyhow::Result<()> + Send>;

/// Host-bound on-load hook bodies, keyed case-insensitively by unit name
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, OnLoadFn>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the on-load hook body for `unit`, replacing any previous binding
    pub fn bind<F>(&mut self, unit: &SymbolName, hook: F)
    where
        F: FnMut(&UnitDescriptor) -> anyhow::Result<()> + Send + 'static,
    {
        self.hooks.insert(unit.lookup_key(), Box::new(hook));
    }

    pub fn is_bound(&self, unit: &SymbolName) -> bool {
        self.hooks.contains_key(&unit.lookup_key())
    }

    /// Run the bound hook for `unit`. Returns `None` when nothing is bound.
    pub fn invoke(&mut self, unit: &UnitDescriptor) -> Option<anyhow::Result<()>> {
        self.hooks
            .get_mut(&unit.name.lookup_key())
            .map(|hook| hook(unit))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("bound", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
