//! Shared access to a class loader
//!
//! The loader is single-threaded by construction. Hosts that serve requests
//! from several threads share one loader behind a mutex; every mutation the
//! loader performs is a monotonic insert, so a plain lock is enough.

use crate::error::LoadError;
use crate::loader::ClassLoader;
use crate::symbols::Autoload;
use crate::types::SymbolName;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cloneable, thread-safe handle to a `ClassLoader`
#[derive(Clone, Debug)]
pub struct SharedClassLoader {
    inner: Arc<Mutex<ClassLoader>>,
}

impl SharedClassLoader {
    pub fn new(loader: ClassLoader) -> Self {
        Self {
            inner: Arc::new(Mutex::new(loader)),
        }
    }

    pub fn load(&self, name: &str) -> Result<bool, LoadError> {
        self.inner.lock().load(name)
    }

    pub fn resolve(&self, name: &str) -> Result<bool, LoadError> {
        self.inner.lock().resolve(name)
    }

    pub fn load_model(
        &self,
        name: &str,
        local_scope: Option<&str>,
    ) -> Result<Option<SymbolName>, LoadError> {
        self.inner.lock().load_model(name, local_scope)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.inner.lock().exists(name)
    }

    /// Exclusive access for anything not covered above
    pub fn lock(&self) -> MutexGuard<'_, ClassLoader> {
        self.inner.lock()
    }
}

impl Autoload for SharedClassLoader {
    fn autoload(&mut self, name: &SymbolName) -> Result<bool, LoadError> {
        self.inner.lock().autoload(name)
    }
}
