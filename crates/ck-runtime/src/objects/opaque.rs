//! Interpreter-owned object kinds.
//!
//! The embedding API never looks inside these; they only need to be tagged,
//! traced and passed around on the stack.

use core::any::Any;

use crate::gc::GcRef;
use crate::value::Value;

#[derive(Debug)]
pub struct ClassObj {
    pub name: Option<GcRef>,
    pub superclass: Option<GcRef>,
    /// Method table (dictionary).
    pub methods: GcRef,
}

#[derive(Debug)]
pub struct FunctionObj {
    pub name: Option<GcRef>,
    pub module: Option<GcRef>,
    pub arity: u8,
}

#[derive(Debug)]
pub struct ClosureObj {
    pub function: GcRef,
    pub upvalues: Vec<GcRef>,
}

#[derive(Debug)]
pub struct InstanceObj {
    pub class: GcRef,
    pub fields: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeObj {
    pub from: i64,
    pub to: i64,
    pub inclusive: bool,
}

#[derive(Debug)]
pub struct UpvalueObj {
    pub value: Value,
}

/// Script-visible handle to a fiber owned by the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiberObj {
    pub id: u32,
}

/// Opaque host data.
pub struct ForeignObj {
    pub data: Box<dyn Any>,
}

impl ForeignObj {
    pub fn new<T: Any>(data: T) -> Self {
        Self { data: Box::new(data) }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }
}

impl core::fmt::Debug for ForeignObj {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ForeignObj").finish_non_exhaustive()
    }
}
