//! String operations.

use ck_runtime::objects::{string, StringObj};
use ck_runtime::{HeapObject, Value};

use crate::vm::{normalize_index, Vm, VmResult};

impl Vm {
    /// Push a new string holding a copy of `bytes`.
    pub fn push_string(&mut self, bytes: impl AsRef<[u8]>) -> VmResult<()> {
        self.push_new(HeapObject::String(StringObj::new(bytes.as_ref())))
    }

    /// Bytes of the string at `index`, or `None` if it is not a string.
    pub fn get_string(&self, index: isize) -> Option<&[u8]> {
        let handle = self.get_value(index).as_object()?;
        string::as_bytes(self.gc(), handle)
    }

    /// Like [`Vm::get_string`], but only for valid UTF-8.
    pub fn get_str(&self, index: isize) -> Option<&str> {
        let handle = self.get_value(index).as_object()?;
        self.gc().get(handle)?.as_string()?.as_str()
    }

    /// Push `string[start..end]` of the string at `index`.
    ///
    /// Negative bounds count from the end: `-k` addresses the same byte as
    /// `len - k`, so `-1` is the last byte rather than one past it. Out-of-range
    /// bounds are clamped, and a crossed or empty range gives the empty string,
    /// as does a non-string source.
    pub fn push_substring(&mut self, index: isize, start: isize, end: isize) -> VmResult<()> {
        self.assert_can_push(1);
        let bytes = match self.get_string(index) {
            Some(source) => {
                let len = source.len();
                let start = normalize_index(start, len);
                let end = normalize_index(end, len);
                if start >= len || start >= end {
                    Vec::new()
                } else {
                    source[start..end].to_vec()
                }
            }
            None => Vec::new(),
        };
        self.push_new(HeapObject::String(StringObj::from_vec(bytes)))
    }

    /// Pop `count` values and push the concatenation of the strings among
    /// them, in stack order. Other values contribute nothing.
    ///
    /// The operands are consumed even if allocation fails, in which case
    /// `Null` is pushed.
    ///
    /// # Panics
    ///
    /// Panics if the frame holds fewer than `count` values.
    pub fn concatenate(&mut self, count: usize) -> VmResult<()> {
        let fiber = self.fiber();
        assert!(count <= fiber.count(), "stack underflow");
        if count == 0 {
            self.assert_can_push(1);
        }
        let start = fiber.top - count;
        let operands = &fiber.live()[start..];

        let gc = self.gc();
        let string_bytes = |value: &Value| {
            value
                .as_object()
                .and_then(|handle| gc.get(handle))
                .and_then(HeapObject::as_string)
                .map(StringObj::as_bytes)
        };
        let total: usize = operands.iter().filter_map(&string_bytes).map(<[u8]>::len).sum();
        let mut buffer = Vec::with_capacity(total);
        for bytes in operands.iter().filter_map(&string_bytes) {
            buffer.extend_from_slice(bytes);
        }

        let result = self.alloc(HeapObject::String(StringObj::from_vec(buffer)));
        self.fiber_mut().truncate(start);
        match result {
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
}
