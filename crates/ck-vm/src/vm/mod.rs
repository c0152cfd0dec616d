//! Virtual machine handle.
//!
//! Owns the heap, the active fiber, fibers suspended underneath it, the
//! explicit root stack and the foreign module registry. Every embedding API
//! call goes through a `&mut Vm`.

mod helpers;
mod types;

pub use helpers::{element_index, normalize_index};
pub use types::{VmError, VmResult, VmState};

use std::panic::{self, AssertUnwindSafe};

use ck_runtime::{Gc, GcRef, HeapObject, Value};

use crate::config::VmConfig;
use crate::fiber::Fiber;
use crate::modules::{ForeignFn, ModuleRegistry};

pub struct Vm {
    pub(crate) state: VmState,
    /// Fiber host calls operate on.
    pub(crate) fiber: Option<Fiber>,
    /// Fibers parked while a nested fiber runs, innermost last.
    pub(crate) suspended: Vec<Fiber>,
    /// Objects pinned across multi-step constructions.
    pub(crate) roots: Vec<GcRef>,
    pub(crate) modules: ModuleRegistry,
    pub(crate) module_path: Option<GcRef>,
    pub(crate) config: VmConfig,
    next_fiber_id: u32,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            state: VmState::new(config.gc_config()),
            fiber: None,
            suspended: Vec::new(),
            roots: Vec::new(),
            modules: ModuleRegistry::new(),
            module_path: None,
            config,
            next_fiber_id: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    #[inline]
    pub fn gc(&self) -> &Gc {
        &self.state.gc
    }

    #[inline]
    pub fn has_fiber(&self) -> bool {
        self.fiber.is_some()
    }

    /// # Panics
    ///
    /// Panics if no fiber has been created yet.
    #[inline]
    pub(crate) fn fiber(&self) -> &Fiber {
        match &self.fiber {
            Some(fiber) => fiber,
            None => panic!("no active fiber"),
        }
    }

    #[inline]
    pub(crate) fn fiber_mut(&mut self) -> &mut Fiber {
        match &mut self.fiber {
            Some(fiber) => fiber,
            None => panic!("no active fiber"),
        }
    }

    pub(crate) fn new_fiber(&mut self) -> Fiber {
        let id = self.next_fiber_id;
        self.next_fiber_id = self.next_fiber_id.wrapping_add(1);
        Fiber::new(id, self.config.initial_stack_slots)
    }

    // === Allocation ===

    /// Allocate a heap object, collecting first if the heap asks for it.
    ///
    /// The new object is unrooted: push it or pin it before the next
    /// allocation.
    pub fn alloc(&mut self, object: HeapObject) -> VmResult<GcRef> {
        self.make_room(object.heap_size());
        Ok(self.state.gc.alloc(object)?)
    }

    /// Charge `extra` bytes of growth to `object` before it grows.
    ///
    /// `object`, and anything about to be stored in it, must be reachable
    /// from a root: this may collect.
    pub(crate) fn charge(&mut self, object: GcRef, extra: usize) -> VmResult<()> {
        if extra == 0 {
            return Ok(());
        }
        self.make_room(extra);
        Ok(self.state.gc.charge(object, extra)?)
    }

    fn make_room(&mut self, size: usize) {
        let gc = &self.state.gc;
        if self.config.gc_stress || gc.should_collect() || !gc.can_alloc(size) {
            self.collect_garbage();
        }
    }

    // === Root stack ===

    #[inline]
    pub fn push_root(&mut self, object: GcRef) {
        self.roots.push(object);
    }

    /// # Panics
    ///
    /// Panics if the root stack is empty.
    #[inline]
    pub fn pop_root(&mut self) -> GcRef {
        match self.roots.pop() {
            Some(object) => object,
            None => panic!("root stack underflow"),
        }
    }

    /// Run `f` with `objects` pinned. They are unpinned when `f` returns or
    /// unwinds.
    pub fn with_roots<R>(&mut self, objects: &[GcRef], f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.roots.len();
        self.roots.extend_from_slice(objects);
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&mut *self)));
        self.roots.truncate(depth);
        match result {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    // === Native calls ===

    /// Call `function` with the top `arg_count` slots as its frame.
    ///
    /// The frame is replaced by the callee's return value: the top slot it
    /// leaves, or `Null` if it leaves the frame empty.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `arg_count` values are on the stack.
    pub fn call_foreign(&mut self, function: ForeignFn, arg_count: usize) {
        let fiber = self.fiber_mut();
        assert!(arg_count <= fiber.count(), "not enough arguments on the stack");
        let start = fiber.top - arg_count;
        let depth = fiber.frames.len();
        fiber.push_frame(start);

        function(self);

        let limit = self.config.max_stack_slots;
        let fiber = self.fiber_mut();
        let result = if fiber.top > start {
            fiber.get(fiber.top - 1)
        } else {
            Value::Null
        };
        fiber.frames.truncate(depth);
        fiber.truncate(start);
        if !fiber.can_push(1) {
            fiber.grow(start + 1, limit);
        }
        fiber.push(result);
    }

    /// Run `f` on a fresh fiber. The current fiber stays rooted while
    /// suspended and becomes active again afterwards.
    pub fn run_on_new_fiber<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let fiber = self.new_fiber();
        log::trace!("switch to fiber {}", fiber.id);
        let previous = self.fiber.replace(fiber);
        let resumed = previous.is_some();
        if let Some(previous) = previous {
            self.suspended.push(previous);
        }

        let result = f(self);

        self.fiber = if resumed { self.suspended.pop() } else { None };
        if let Some(fiber) = &self.fiber {
            log::trace!("resume fiber {}", fiber.id);
        }
        result
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
