//! Stack management and value primitives.

use ck_runtime::{ApiType, HeapObject, Value};

use crate::vm::{Vm, VmError, VmResult};

impl Vm {
    /// Slots available to the host, counted from the innermost frame's start.
    /// 0 before any fiber exists.
    pub fn stack_size(&self) -> usize {
        self.fiber
            .as_ref()
            .map_or(0, |fiber| fiber.capacity() - fiber.base())
    }

    /// Make room for `count` more pushes, creating the first fiber if needed.
    ///
    /// Growing may move the stack; slot contents are preserved.
    pub fn ensure_stack(&mut self, count: usize) -> VmResult<()> {
        if self.fiber.is_none() {
            let fiber = self.new_fiber();
            log::trace!("created fiber {}", fiber.id);
            self.fiber = Some(fiber);
        }
        let limit = self.config.max_stack_slots;
        let fiber = self.fiber_mut();
        if fiber.can_push(count) {
            return Ok(());
        }
        let requested = fiber.top.saturating_add(count);
        if requested > limit {
            return Err(VmError::StackOverflow { requested, limit });
        }
        fiber.grow(requested, limit);
        Ok(())
    }

    /// Occupied slots in the current frame.
    pub fn stack_count(&self) -> usize {
        self.fiber.as_ref().map_or(0, |fiber| fiber.count())
    }

    /// Pop `count` values.
    ///
    /// # Panics
    ///
    /// Panics if the frame holds fewer than `count` values.
    pub fn stack_pop(&mut self, count: usize) {
        let fiber = self.fiber_mut();
        assert!(count <= fiber.count(), "stack underflow");
        let top = fiber.top - count;
        fiber.truncate(top);
    }

    /// Raw value at `index`.
    pub fn get_value(&self, index: isize) -> Value {
        let fiber = self.fiber();
        fiber.get(fiber.resolve(index))
    }

    /// Push a raw value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is full.
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.fiber_mut().push(value);
    }

    pub(crate) fn pop(&mut self) -> Value {
        self.fiber_mut().pop()
    }

    pub(crate) fn assert_can_push(&self, count: usize) {
        assert!(
            self.fiber.as_ref().is_some_and(|f| f.can_push(count)),
            "no room to push {} values",
            count
        );
    }

    /// Allocate `object` and push it, or push `Null` if allocation fails.
    pub(crate) fn push_new(&mut self, object: HeapObject) -> VmResult<()> {
        self.assert_can_push(1);
        match self.alloc(object) {
            Ok(handle) => {
                self.push(Value::Object(handle));
                Ok(())
            }
            Err(err) => {
                self.push(Value::Null);
                Err(err)
            }
        }
    }

    /// Push a copy of the value at `index`.
    pub fn push_value(&mut self, index: isize) {
        let value = self.get_value(index);
        self.push(value);
    }

    /// Remove the value at `index`, shifting the values above it down.
    pub fn stack_remove(&mut self, index: isize) {
        let fiber = self.fiber_mut();
        let slot = fiber.resolve(index);
        fiber.remove(slot);
    }

    /// Move the top value down to `index`, shifting the values at and above
    /// it up by one.
    pub fn stack_insert(&mut self, index: isize) {
        let fiber = self.fiber_mut();
        let slot = fiber.resolve(index);
        fiber.insert_top(slot);
    }

    /// Pop the top value and store it at `index`.
    pub fn stack_replace(&mut self, index: isize) {
        let fiber = self.fiber_mut();
        let slot = fiber.resolve(index);
        let value = fiber.pop();
        if slot < fiber.top {
            fiber.set(slot, value);
        }
    }

    pub fn get_type(&self, index: isize) -> ApiType {
        match self.get_value(index) {
            Value::Null => ApiType::Null,
            Value::Integer(_) => ApiType::Integer,
            Value::Object(handle) => self
                .gc()
                .kind(handle)
                .map_or(ApiType::Object, |kind| kind.api_type()),
        }
    }

    #[inline]
    pub fn push_null(&mut self) {
        self.push(Value::Null);
    }

    #[inline]
    pub fn push_integer(&mut self, value: i64) {
        self.push(Value::Integer(value));
    }

    /// Integer at `index`, or 0 if the slot holds anything else.
    pub fn get_integer(&self, index: isize) -> i64 {
        self.get_value(index).as_integer().unwrap_or(0)
    }

    /// Allocate an arbitrary heap object and push it.
    pub fn push_object(&mut self, object: HeapObject) -> VmResult<()> {
        self.push_new(object)
    }
}
