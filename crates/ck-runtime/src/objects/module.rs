//! Module object.
//!
//! A module is created when it is registered and populated lazily, the first
//! time script code imports it.

use crate::gc::GcRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Debug)]
pub struct ModuleObj {
    /// Full dotted name (string).
    pub name: GcRef,
    /// Path the module was loaded from (string), if any.
    pub path: Option<GcRef>,
    /// Module-level variables (dictionary).
    pub variables: GcRef,
    pub state: ModuleState,
}

impl ModuleObj {
    pub fn new(name: GcRef, path: Option<GcRef>, variables: GcRef) -> Self {
        Self {
            name,
            path,
            variables,
            state: ModuleState::Unloaded,
        }
    }
}
