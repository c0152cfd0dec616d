//! Foreign module registry.
//!
//! A foreign module is registered by the host ahead of time and loaded the
//! first time script code imports its dotted name. The registry owns the
//! module object (keeping it rooted), the load callback and any native
//! handle the host wants released together with the module.

use std::any::Any;
use std::path::Path;

use hashbrown::HashMap;
use libloading::Library;

use ck_runtime::GcRef;

use crate::vm::Vm;

/// Native function callable from the VM. Arguments and results are exchanged
/// through the stack.
pub type ForeignFn = fn(&mut Vm);

/// Host resource kept alive for as long as its module is registered.
pub enum NativeHandle {
    /// Shared library the module's functions live in.
    Library(Library),
    /// Arbitrary host data.
    Data(Box<dyn Any>),
}

impl NativeHandle {
    /// Open a shared library to back a foreign module.
    pub fn open(path: &Path) -> Result<Self, libloading::Error> {
        // Symbols must be visible to libraries loaded after this one.
        #[cfg(unix)]
        let lib = unsafe {
            let flags = libloading::os::unix::RTLD_NOW | libloading::os::unix::RTLD_GLOBAL;
            libloading::os::unix::Library::open(Some(path), flags).map(Library::from)?
        };
        #[cfg(not(unix))]
        let lib = unsafe { Library::new(path)? };
        Ok(NativeHandle::Library(lib))
    }

    pub fn data<T: Any>(data: T) -> Self {
        NativeHandle::Data(Box::new(data))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            NativeHandle::Data(data) => data.downcast_ref(),
            NativeHandle::Library(_) => None,
        }
    }
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeHandle::Library(lib) => f.debug_tuple("Library").field(lib).finish(),
            NativeHandle::Data(_) => f.write_str("Data(..)"),
        }
    }
}

#[derive(Debug)]
pub struct ForeignModule {
    pub module: GcRef,
    pub handle: Option<NativeHandle>,
    pub loader: ForeignFn,
}

/// Registered foreign modules keyed by full dotted name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ForeignModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `name`, returning any registration it replaces.
    pub fn insert(&mut self, name: &str, module: ForeignModule) -> Option<ForeignModule> {
        self.modules.insert(name.to_owned(), module)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ForeignModule> {
        self.modules.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ForeignModule> {
        self.modules.remove(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module objects of every registration, for root scanning.
    pub fn module_refs(&self) -> impl Iterator<Item = GcRef> + '_ {
        self.modules.values().map(|m| m.module)
    }
}
