//! Heap object kinds.
//!
//! Strings, lists, dictionaries and modules are fully modelled here because
//! the embedding API reads and mutates them. The remaining kinds belong to
//! the interpreter; the runtime only needs to tag, trace and size them.

pub mod dict;
pub mod list;
pub mod module;
pub mod opaque;
pub mod string;

pub use dict::{DictEntry, DictObj};
pub use list::ListObj;
pub use module::{ModuleObj, ModuleState};
pub use opaque::{
    ClassObj, ClosureObj, FiberObj, ForeignObj, FunctionObj, InstanceObj, RangeObj, UpvalueObj,
};
pub use string::StringObj;

use ck_common_core::ObjectKind;

#[derive(Debug)]
pub enum HeapObject {
    Class(ClassObj),
    Closure(ClosureObj),
    Dict(DictObj),
    Fiber(FiberObj),
    Foreign(ForeignObj),
    Function(FunctionObj),
    Instance(InstanceObj),
    List(ListObj),
    Module(ModuleObj),
    Range(RangeObj),
    String(StringObj),
    Upvalue(UpvalueObj),
}

impl HeapObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            HeapObject::Class(_) => ObjectKind::Class,
            HeapObject::Closure(_) => ObjectKind::Closure,
            HeapObject::Dict(_) => ObjectKind::Dict,
            HeapObject::Fiber(_) => ObjectKind::Fiber,
            HeapObject::Foreign(_) => ObjectKind::Foreign,
            HeapObject::Function(_) => ObjectKind::Function,
            HeapObject::Instance(_) => ObjectKind::Instance,
            HeapObject::List(_) => ObjectKind::List,
            HeapObject::Module(_) => ObjectKind::Module,
            HeapObject::Range(_) => ObjectKind::Range,
            HeapObject::String(_) => ObjectKind::String,
            HeapObject::Upvalue(_) => ObjectKind::Upvalue,
        }
    }

    /// Approximate bytes owned by this object, used for GC pacing.
    pub fn heap_size(&self) -> usize {
        let payload = match self {
            HeapObject::String(s) => s.len(),
            HeapObject::List(l) => l.capacity() * core::mem::size_of::<crate::Value>(),
            HeapObject::Dict(d) => d.capacity() * core::mem::size_of::<DictEntry>(),
            HeapObject::Closure(c) => c.upvalues.len() * core::mem::size_of::<crate::GcRef>(),
            HeapObject::Instance(i) => i.fields.len() * core::mem::size_of::<crate::Value>(),
            _ => 0,
        };
        core::mem::size_of::<HeapObject>() + payload
    }

    #[inline]
    pub fn as_string(&self) -> Option<&StringObj> {
        match self {
            HeapObject::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListObj> {
        match self {
            HeapObject::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_mut(&mut self) -> Option<&mut ListObj> {
        match self {
            HeapObject::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_dict(&self) -> Option<&DictObj> {
        match self {
            HeapObject::Dict(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_dict_mut(&mut self) -> Option<&mut DictObj> {
        match self {
            HeapObject::Dict(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_module(&self) -> Option<&ModuleObj> {
        match self {
            HeapObject::Module(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_module_mut(&mut self) -> Option<&mut ModuleObj> {
        match self {
            HeapObject::Module(m) => Some(m),
            _ => None,
        }
    }
}
