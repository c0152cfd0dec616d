//! VM types and state definitions.

use thiserror::Error;

use ck_runtime::{AllocError, Gc, GcConfig};

#[derive(Debug, Error)]
pub enum VmError {
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] AllocError),
    #[error("stack overflow: {requested} slots requested, limit is {limit}")]
    StackOverflow { requested: usize, limit: usize },
}

pub type VmResult<T> = Result<T, VmError>;

/// VM mutable state that can be borrowed independently from the fibers.
pub struct VmState {
    pub gc: Gc,
}

impl VmState {
    pub fn new(config: GcConfig) -> Self {
        Self {
            gc: Gc::with_config(config),
        }
    }
}

impl Default for VmState {
    fn default() -> Self {
        Self::new(GcConfig::default())
    }
}
