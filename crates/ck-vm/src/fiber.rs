//! Fiber (coroutine) stack and call frames.
//!
//! `stack.len()` is the capacity; slots at or above `top` are always `Null`
//! so the collector can scan `[0, top)` without looking at stale values.

use ck_runtime::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Slot that is index 0 for this call.
    pub stack_start: usize,
}

#[derive(Debug)]
pub struct Fiber {
    pub id: u32,
    pub stack: Vec<Value>,
    pub top: usize,
    pub frames: Vec<CallFrame>,
}

impl Fiber {
    pub fn new(id: u32, capacity: usize) -> Self {
        Self {
            id,
            stack: vec![Value::Null; capacity],
            top: 0,
            frames: Vec::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.stack.len()
    }

    /// Start of the innermost frame, or 0 with no frame.
    #[inline]
    pub fn base(&self) -> usize {
        self.frames.last().map_or(0, |f| f.stack_start)
    }

    /// Slots occupied above the base.
    #[inline]
    pub fn count(&self) -> usize {
        self.top - self.base()
    }

    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.top
    }

    #[inline]
    pub fn can_push(&self, count: usize) -> bool {
        self.free_slots() >= count
    }

    /// Occupied slots, bottom to top.
    #[inline]
    pub fn live(&self) -> &[Value] {
        &self.stack[..self.top]
    }

    /// Resolve a host stack index to an absolute slot.
    ///
    /// Non-negative indices count up from the base, negative ones down from
    /// the top.
    ///
    /// # Panics
    ///
    /// Panics if the slot falls outside `[base, top)`.
    pub fn resolve(&self, index: isize) -> usize {
        let base = self.base();
        let slot = if index >= 0 {
            base.checked_add(index as usize)
        } else {
            self.top.checked_sub(index.unsigned_abs())
        };
        match slot {
            Some(slot) if slot >= base && slot < self.top => slot,
            _ => panic!(
                "stack index {} out of range (base {}, top {})",
                index, base, self.top
            ),
        }
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Value {
        self.stack[slot]
    }

    #[inline]
    pub fn set(&mut self, slot: usize, value: Value) {
        self.stack[slot] = value;
    }

    /// # Panics
    ///
    /// Panics if the stack is full.
    #[inline]
    pub fn push(&mut self, value: Value) {
        assert!(
            self.top < self.capacity(),
            "stack overflow: capacity {} exhausted",
            self.capacity()
        );
        self.stack[self.top] = value;
        self.top += 1;
    }

    /// # Panics
    ///
    /// Panics if the current frame is empty.
    #[inline]
    pub fn pop(&mut self) -> Value {
        assert!(self.top > self.base(), "stack underflow");
        self.top -= 1;
        core::mem::take(&mut self.stack[self.top])
    }

    /// Drop everything at or above `new_top`.
    pub fn truncate(&mut self, new_top: usize) {
        if new_top < self.top {
            self.stack[new_top..self.top].fill(Value::Null);
            self.top = new_top;
        }
    }

    /// Delete `slot`, shifting the slots above it down by one.
    pub fn remove(&mut self, slot: usize) -> Value {
        let value = self.stack[slot];
        self.stack.copy_within(slot + 1..self.top, slot);
        self.top -= 1;
        self.stack[self.top] = Value::Null;
        value
    }

    /// Move the top value down into `slot`, shifting the slots at or above it
    /// up by one.
    pub fn insert_top(&mut self, slot: usize) {
        self.stack[slot..self.top].rotate_right(1);
    }

    /// Grow to hold at least `min_capacity` slots, rounding up to a power of
    /// two but not past `limit`.
    pub fn grow(&mut self, min_capacity: usize, limit: usize) {
        if min_capacity > self.capacity() {
            let new_capacity = min_capacity
                .checked_next_power_of_two()
                .map_or(min_capacity, |c| c.min(limit))
                .max(min_capacity);
            log::trace!(
                "fiber {}: stack {} -> {} slots",
                self.id,
                self.capacity(),
                new_capacity
            );
            self.stack.resize(new_capacity, Value::Null);
        }
    }

    pub fn push_frame(&mut self, stack_start: usize) {
        debug_assert!(stack_start <= self.top);
        self.frames.push(CallFrame { stack_start });
    }

    pub fn pop_frame(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }
}
