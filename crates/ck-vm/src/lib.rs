//! Chalk virtual machine and embedding API.
//!
//! Host code talks to the VM through a value stack: arguments are pushed,
//! operations address slots by index, and every object an operation creates
//! is pushed so it is both returned to the host and kept alive.
//!
//! ```text
//! vm.ensure_stack(4)?;
//! vm.push_dict()?;
//! vm.push_integer(1);
//! vm.push_string("one")?;
//! vm.dict_set(0)?;
//! ```

pub mod api;
pub mod config;
pub mod fiber;
mod gc_roots;
pub mod modules;
pub mod vm;

pub use ck_runtime::{ApiType, GcRef, Value};
pub use config::VmConfig;
pub use modules::{ForeignFn, NativeHandle};
pub use vm::{Vm, VmError, VmResult};
