//! List operations.

use ck_runtime::objects::ListObj;
use ck_runtime::{HeapObject, Value};

use crate::vm::{element_index, Vm, VmResult};

impl Vm {
    pub fn push_list(&mut self) -> VmResult<()> {
        self.push_new(HeapObject::List(ListObj::new()))
    }

    /// Push element `list_index` of the list at `index`. Negative indices
    /// count from the end; anything outside `[-count, count)` pushes `Null`.
    pub fn list_get(&mut self, index: isize, list_index: isize) -> Value {
        self.assert_can_push(1);
        let value = self
            .get_value(index)
            .as_object()
            .and_then(|l| self.gc().get(l))
            .and_then(HeapObject::as_list)
            .and_then(|list| list.get(element_index(list_index, list.len())?))
            .unwrap_or(Value::Null);
        self.push(value);
        value
    }

    /// Pop a value and store it at `list_index` in the list at `index`.
    ///
    /// `list_index == count` appends. Any other index outside
    /// `[-count, count)`, or a target that is not a list, discards the value.
    /// The value is popped even when growing the list fails.
    pub fn list_set(&mut self, index: isize, list_index: isize) -> VmResult<()> {
        let target = self.get_value(index).as_object().and_then(|l| {
            let list = self.gc().get(l)?.as_list()?;
            Some((l, list.len(), list.push_growth()))
        });
        let Some((list_ref, len, growth)) = target else {
            self.pop();
            return Ok(());
        };

        let append = list_index >= 0 && list_index as usize == len;
        let charged = if append {
            self.charge(list_ref, growth)
        } else {
            Ok(())
        };
        let value = self.pop();
        charged?;

        let Some(list) = self
            .state
            .gc
            .get_mut(list_ref)
            .and_then(HeapObject::as_list_mut)
        else {
            return Ok(());
        };
        if append {
            list.push(value);
        } else if let Some(i) = element_index(list_index, len) {
            list.set(i, value);
        }
        Ok(())
    }

    /// Number of elements, or 0 if `index` is not a list.
    pub fn list_size(&self, index: isize) -> usize {
        self.get_value(index)
            .as_object()
            .and_then(|l| self.gc().get(l))
            .and_then(HeapObject::as_list)
            .map_or(0, ListObj::len)
    }
}
