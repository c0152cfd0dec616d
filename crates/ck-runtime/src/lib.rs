//! Chalk runtime - shared data structures for the VM and its embedding API.
//!
//! This crate owns everything that lives on the garbage collected heap:
//! - `Value` - the tagged value exchanged across the host boundary
//! - `Gc` / `GcRef` - the mark-and-sweep heap and its generational handles
//! - `objects` - strings, lists, dictionaries, modules and the opaque kinds

pub mod gc;
pub mod gc_types;
pub mod hash;
pub mod objects;
pub mod value;

pub use ck_common_core::{ApiType, ObjectKind, API_OBJECT_TYPES};
pub use gc::{AllocError, CollectStats, Gc, GcConfig, GcRef};
pub use objects::HeapObject;
pub use value::Value;
