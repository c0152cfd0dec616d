//! List object: a growable array of values.

use crate::value::Value;

const MIN_CAPACITY: usize = 4;

#[derive(Debug, Default)]
pub struct ListObj {
    elements: Vec<Value>,
}

impl ListObj {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.get(index).copied()
    }

    /// Overwrite an existing element. Returns false if `index` is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Bytes the next `push` will allocate.
    pub fn push_growth(&self) -> usize {
        match self.grown_capacity() {
            Some(capacity) => (capacity - self.elements.capacity()) * core::mem::size_of::<Value>(),
            None => 0,
        }
    }

    /// Append `value`, doubling the capacity when full.
    pub fn push(&mut self, value: Value) {
        if let Some(capacity) = self.grown_capacity() {
            self.elements.reserve_exact(capacity - self.elements.len());
        }
        self.elements.push(value);
    }

    fn grown_capacity(&self) -> Option<usize> {
        let capacity = self.elements.capacity();
        (self.elements.len() == capacity).then(|| (capacity * 2).max(MIN_CAPACITY))
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }
}
