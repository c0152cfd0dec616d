//! VM Configuration
//!
//! Stack and heap limits for a virtual machine instance.

use ck_runtime::GcConfig;

#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Capacity of a freshly created fiber stack, in slots.
    pub initial_stack_slots: usize,

    /// Largest capacity a fiber stack may grow to.
    pub max_stack_slots: usize,

    /// Heap bytes allocated before the first collection.
    pub gc_initial_threshold: usize,

    /// Threshold growth over surviving bytes after each collection, in percent.
    pub gc_growth_percent: usize,

    /// Hard cap on heap bytes. Allocations beyond it fail.
    pub heap_limit: Option<usize>,

    /// Collect before every allocation.
    pub gc_stress: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            initial_stack_slots: 64,
            max_stack_slots: 1 << 20,
            gc_initial_threshold: 1024 * 1024,
            gc_growth_percent: 50,
            heap_limit: None,
            gc_stress: false,
        }
    }
}

impl VmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_stack_slots(mut self, slots: usize) -> Self {
        self.initial_stack_slots = slots;
        self
    }

    pub fn with_max_stack_slots(mut self, slots: usize) -> Self {
        self.max_stack_slots = slots;
        self
    }

    pub fn with_heap_limit(mut self, bytes: usize) -> Self {
        self.heap_limit = Some(bytes);
        self
    }

    pub fn with_gc_stress(mut self, stress: bool) -> Self {
        self.gc_stress = stress;
        self
    }

    pub fn gc_config(&self) -> GcConfig {
        GcConfig {
            initial_threshold: self.gc_initial_threshold,
            growth_percent: self.gc_growth_percent,
            heap_limit: self.heap_limit,
        }
    }
}
