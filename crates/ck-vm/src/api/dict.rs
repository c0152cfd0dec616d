//! Dictionary operations.

use ck_runtime::objects::{dict, DictObj};
use ck_runtime::{HeapObject, Value};

use crate::vm::{Vm, VmResult};

impl Vm {
    pub fn push_dict(&mut self) -> VmResult<()> {
        self.push_new(HeapObject::Dict(DictObj::new()))
    }

    /// Pop a key and push its value in the dictionary at `index`, or `Null`.
    ///
    /// `index` is resolved before the key is popped.
    pub fn dict_get(&mut self, index: isize) -> Value {
        let target = self.get_value(index);
        let key = self.pop();
        let value = target
            .as_object()
            .and_then(|d| dict::get(self.gc(), d, key))
            .unwrap_or(Value::Null);
        self.push(value);
        value
    }

    /// Pop a key (top) and a value (below it) and store the pair in the
    /// dictionary at `index`. Both are discarded if the target is not a
    /// dictionary, or if growing the dictionary fails.
    pub fn dict_set(&mut self, index: isize) -> VmResult<()> {
        let target = self.get_value(index).as_object();
        let charged = match target {
            Some(d) => {
                let growth = dict::insert_growth(self.gc(), d, self.get_value(-1));
                self.charge(d, growth)
            }
            None => Ok(()),
        };
        let key = self.pop();
        let value = self.pop();
        charged?;

        if let Some(d) = target {
            dict::set(&mut self.state.gc, d, key, value);
        }
        Ok(())
    }

    /// Pop a key and remove it from the dictionary at `index`. Returns whether
    /// a pair was removed.
    pub fn dict_remove(&mut self, index: isize) -> bool {
        let target = self.get_value(index);
        let key = self.pop();
        target
            .as_object()
            .and_then(|d| dict::remove(&mut self.state.gc, d, key))
            .is_some()
    }

    /// Number of pairs, or 0 if `index` is not a dictionary.
    pub fn dict_size(&self, index: isize) -> usize {
        self.get_value(index)
            .as_object()
            .map_or(0, |d| dict::len(self.gc(), d))
    }

    /// Advance the iteration cursor on top of the stack over the dictionary
    /// at `index`.
    ///
    /// Seed with `Null`. On success the cursor is updated in place and the
    /// key and value are pushed over it; the caller pops both before the
    /// next call. When the entries run out, or the cursor is not a valid
    /// slot, the cursor is reset to `Null` and `false` returned. A target
    /// that is not a dictionary returns `false` and leaves the cursor.
    ///
    /// The cursor is a slot position: mutating the dictionary mid-iteration
    /// gives unspecified results.
    pub fn dict_iterate(&mut self, index: isize) -> bool {
        self.assert_can_push(2);
        let target = self.get_value(index);
        let Some(obj) = target
            .as_object()
            .and_then(|d| self.gc().get(d))
            .and_then(HeapObject::as_dict)
        else {
            return false;
        };

        let fiber = self.fiber();
        let cursor_slot = fiber.resolve(-1);
        let from = match fiber.get(cursor_slot) {
            Value::Null => Some(0),
            Value::Integer(i) if i >= 0 && (i as u64) < obj.capacity() as u64 => {
                Some(i as usize + 1)
            }
            _ => None,
        };
        let next = from
            .and_then(|from| obj.next_occupied(from))
            .and_then(|slot| Some((slot, obj.entry_at(slot)?)));

        let fiber = self.fiber_mut();
        match next {
            Some((slot, (key, value))) => {
                fiber.set(cursor_slot, Value::Integer(slot as i64));
                fiber.push(key);
                fiber.push(value);
                true
            }
            None => {
                fiber.set(cursor_slot, Value::Null);
                false
            }
        }
    }
}
