//! Dictionary object: open-addressed hash map from values to values.
//!
//! Layout: a power-of-two array of entries searched linearly from the key's
//! hash. Removing a key leaves a tombstone so collision chains stay intact; the
//! array is rebuilt (dropping tombstones) when occupied plus tombstoned
//! entries would exceed the load limit.
//!
//! Key equality needs the heap (string keys compare by content), so lookups
//! take the `Gc` and the dictionary handle rather than `&DictObj`.

use crate::gc::{Gc, GcRef};
use crate::value::Value;

const MIN_CAPACITY: usize = 16;
const MAX_LOAD_PERCENT: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictEntry {
    Empty,
    Tombstone,
    Occupied { key: Value, value: Value, hash: u32 },
}

/// Outcome of probing for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(usize),
    Vacant,
}

#[derive(Debug, Default)]
pub struct DictObj {
    entries: Vec<DictEntry>,
    count: usize,
    tombstones: usize,
}

impl DictObj {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of entry slots, occupied or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// Key and value stored at entry slot `slot`, if occupied.
    #[inline]
    pub fn entry_at(&self, slot: usize) -> Option<(Value, Value)> {
        match self.entries.get(slot)? {
            DictEntry::Occupied { key, value, .. } => Some((*key, *value)),
            _ => None,
        }
    }

    /// First occupied slot at or after `from`.
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        (from..self.entries.len()).find(|&i| matches!(self.entries[i], DictEntry::Occupied { .. }))
    }

    /// Look up `key`. `eq` decides key equality.
    pub fn lookup(&self, key: Value, hash: u32, eq: impl Fn(Value, Value) -> bool) -> Lookup {
        if self.entries.is_empty() {
            return Lookup::Vacant;
        }
        let mask = self.entries.len() - 1;
        let mut index = hash as usize & mask;
        for _ in 0..self.entries.len() {
            match self.entries[index] {
                DictEntry::Empty => return Lookup::Vacant,
                DictEntry::Occupied { key: k, hash: h, .. } if h == hash && eq(k, key) => {
                    return Lookup::Found(index);
                }
                _ => {}
            }
            index = (index + 1) & mask;
        }
        Lookup::Vacant
    }

    #[inline]
    pub fn value_at(&self, slot: usize) -> Option<Value> {
        self.entry_at(slot).map(|(_, v)| v)
    }

    /// Overwrite the value of an occupied slot.
    pub fn set_at(&mut self, slot: usize, new_value: Value) {
        if let Some(DictEntry::Occupied { value, .. }) = self.entries.get_mut(slot) {
            *value = new_value;
        }
    }

    /// Insert a key known to be absent.
    pub fn insert_new(&mut self, key: Value, hash: u32, value: Value) {
        self.reserve_one();
        let mask = self.entries.len() - 1;
        let mut index = hash as usize & mask;
        loop {
            match self.entries[index] {
                DictEntry::Empty => break,
                DictEntry::Tombstone => {
                    self.tombstones -= 1;
                    break;
                }
                DictEntry::Occupied { .. } => index = (index + 1) & mask,
            }
        }
        self.entries[index] = DictEntry::Occupied { key, value, hash };
        self.count += 1;
    }

    /// Remove the entry at an occupied slot, returning its value.
    pub fn remove_at(&mut self, slot: usize) -> Option<Value> {
        let value = self.value_at(slot)?;
        self.entries[slot] = DictEntry::Tombstone;
        self.count -= 1;
        self.tombstones += 1;
        Some(value)
    }

    /// Bytes inserting one new key will allocate.
    pub fn insert_growth(&self) -> usize {
        match self.grown_capacity() {
            Some(capacity) => (capacity - self.entries.len()) * core::mem::size_of::<DictEntry>(),
            None => 0,
        }
    }

    fn reserve_one(&mut self) {
        if let Some(capacity) = self.grown_capacity() {
            self.rebuild(capacity);
        }
    }

    /// Capacity to rebuild at before the next insert, if the load limit
    /// would be exceeded.
    fn grown_capacity(&self) -> Option<usize> {
        let used = self.count + self.tombstones + 1;
        if used * 100 <= self.entries.len() * MAX_LOAD_PERCENT {
            return None;
        }
        let mut capacity = self.entries.len().max(MIN_CAPACITY);
        while (self.count + 1) * 100 > capacity * MAX_LOAD_PERCENT {
            capacity *= 2;
        }
        Some(capacity)
    }

    fn rebuild(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        let old = core::mem::replace(&mut self.entries, vec![DictEntry::Empty; capacity]);
        let mask = capacity - 1;
        for entry in old {
            if let DictEntry::Occupied { hash, .. } = entry {
                let mut index = hash as usize & mask;
                while self.entries[index] != DictEntry::Empty {
                    index = (index + 1) & mask;
                }
                self.entries[index] = entry;
            }
        }
        self.tombstones = 0;
    }
}

fn lookup_in(gc: &Gc, dict: GcRef, key: Value) -> Option<(Lookup, u32)> {
    let hash = gc.hash_value(key);
    let obj = gc.get(dict)?.as_dict()?;
    Some((obj.lookup(key, hash, |a, b| gc.values_equal(a, b)), hash))
}

/// Look up `key` in the dictionary `dict`. `None` if absent or not a dictionary.
pub fn get(gc: &Gc, dict: GcRef, key: Value) -> Option<Value> {
    match lookup_in(gc, dict, key)? {
        (Lookup::Found(slot), _) => gc.get(dict)?.as_dict()?.value_at(slot),
        (Lookup::Vacant, _) => None,
    }
}

/// Insert or overwrite `key`. Returns false if `dict` is not a dictionary.
pub fn set(gc: &mut Gc, dict: GcRef, key: Value, value: Value) -> bool {
    let Some((found, hash)) = lookup_in(gc, dict, key) else {
        return false;
    };
    let Some(obj) = gc.get_mut(dict).and_then(|o| o.as_dict_mut()) else {
        return false;
    };
    match found {
        Lookup::Found(slot) => obj.set_at(slot, value),
        Lookup::Vacant => obj.insert_new(key, hash, value),
    }
    true
}

/// Bytes `set(gc, dict, key, _)` will allocate: 0 when `key` is already
/// present or `dict` is not a dictionary.
pub fn insert_growth(gc: &Gc, dict: GcRef, key: Value) -> usize {
    match lookup_in(gc, dict, key) {
        Some((Lookup::Vacant, _)) => gc
            .get(dict)
            .and_then(|o| o.as_dict())
            .map_or(0, DictObj::insert_growth),
        _ => 0,
    }
}

/// Remove `key`, returning its value if it was present.
pub fn remove(gc: &mut Gc, dict: GcRef, key: Value) -> Option<Value> {
    let (found, _) = lookup_in(gc, dict, key)?;
    let Lookup::Found(slot) = found else {
        return None;
    };
    gc.get_mut(dict)?.as_dict_mut()?.remove_at(slot)
}

#[inline]
pub fn len(gc: &Gc, dict: GcRef) -> usize {
    gc.get(dict).and_then(|o| o.as_dict()).map_or(0, DictObj::len)
}
