//! Binary kernel cache boundary.
//!
//! A cache is purely an optimization: a miss recompiles from scratch and nothing is ever
//! invalidated within a process.

use std::fmt;

use papaya::HashMap;
use tracing::trace;

/// Kernel identifier plus target device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheKey {
    /// Canonical kernel identifier, e.g. `sbfft_m1_M1_Mb1_N8_...`.
    pub identifier: String,
    pub device_id: u64,
}

impl CacheKey {
    pub fn new(identifier: impl Into<String>, device_id: u64) -> Self {
        Self { identifier: identifier.into(), device_id }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identifier, self.device_id)
    }
}

/// Storage for compiled modules, keyed by [`CacheKey`].
pub trait KernelCache<M> {
    fn get(&self, key: &CacheKey) -> Option<M>;
    fn store(&self, key: CacheKey, module: M);
}

/// Lock-free in-memory cache.
pub struct MemoryCache<M> {
    modules: HashMap<CacheKey, M>,
}

impl<M> MemoryCache<M> {
    pub fn new() -> Self {
        Self { modules: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.modules.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.modules.pin().clear();
    }
}

impl<M> Default for MemoryCache<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MemoryCache<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache").field("len", &self.len()).finish()
    }
}

impl<M: Clone> KernelCache<M> for MemoryCache<M> {
    fn get(&self, key: &CacheKey) -> Option<M> {
        let module = self.modules.pin().get(key).cloned();
        trace!(key = %key, hit = module.is_some(), "kernel cache lookup");
        module
    }

    fn store(&self, key: CacheKey, module: M) {
        trace!(key = %key, "kernel cache store");
        self.modules.pin().insert(key, module);
    }
}
