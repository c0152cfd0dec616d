//! Mark-and-sweep garbage collector.
//!
//! Objects live in a slot arena addressed by [`GcRef`]. A slot's generation is
//! bumped every time its object is swept, so a handle that outlived its object
//! resolves to nothing instead of aliasing a newer allocation.
//!
//! The heap does not know its roots. A collection is driven by the owner:
//! mark every root with [`Gc::mark_gray`] / [`Gc::mark_value`], then call
//! [`Gc::collect`] to trace and sweep.

use crate::gc_types::scan_object;
use crate::objects::HeapObject;
use crate::value::Value;
use ck_common_core::ObjectKind;

/// A handle to a GC-managed heap object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GcRef {
    index: u32,
    generation: u32,
}

impl GcRef {
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("heap limit exceeded: {requested} bytes requested with {in_use} of {limit} in use")]
    HeapLimit {
        requested: usize,
        in_use: usize,
        limit: usize,
    },
    #[error("heap slot index overflow")]
    IndexOverflow,
}

/// Heap tuning.
#[derive(Debug, Clone)]
pub struct GcConfig {
    /// Bytes allocated before the first collection is requested.
    pub initial_threshold: usize,
    /// Growth of the threshold over the surviving bytes, in percent.
    pub growth_percent: usize,
    /// Hard cap on heap bytes, if any.
    pub heap_limit: Option<usize>,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            initial_threshold: 1024 * 1024,
            growth_percent: 50,
            heap_limit: None,
        }
    }
}

/// Result of one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectStats {
    pub objects_before: usize,
    pub objects_after: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

#[derive(Debug)]
struct GcSlot {
    generation: u32,
    marked: bool,
    size: usize,
    object: Option<HeapObject>,
}

#[derive(Debug)]
pub struct Gc {
    slots: Vec<GcSlot>,
    free: Vec<u32>,
    gray: Vec<GcRef>,
    live: usize,
    bytes: usize,
    next_gc: usize,
    config: GcConfig,
}

impl Gc {
    pub fn new() -> Self {
        Self::with_config(GcConfig::default())
    }

    pub fn with_config(config: GcConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            gray: Vec::new(),
            live: 0,
            bytes: 0,
            next_gc: config.initial_threshold,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Whether the allocation threshold has been reached.
    #[inline]
    pub fn should_collect(&self) -> bool {
        self.bytes >= self.next_gc
    }

    /// Whether an allocation of `size` bytes fits under the heap limit.
    #[inline]
    pub fn can_alloc(&self, size: usize) -> bool {
        match self.config.heap_limit {
            Some(limit) => self.bytes.saturating_add(size) <= limit,
            None => true,
        }
    }

    /// Allocate a heap object.
    ///
    /// Never collects; callers that own the roots decide when to collect
    /// before allocating.
    pub fn alloc(&mut self, object: HeapObject) -> Result<GcRef, AllocError> {
        let size = object.heap_size();
        self.check_limit(size)?;

        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.object.is_none(), "free list points at live slot");
            slot.object = Some(object);
            slot.marked = false;
            slot.size = size;
            GcRef { index, generation: slot.generation }
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| AllocError::IndexOverflow)?;
            self.slots.push(GcSlot {
                generation: 0,
                marked: false,
                size,
                object: Some(object),
            });
            GcRef { index, generation: 0 }
        };

        self.live += 1;
        self.bytes += size;
        Ok(handle)
    }

    /// Account for `extra` bytes an object is about to grow by.
    ///
    /// Call before growing the object; on error the object must be left as is.
    /// Collection re-measures every survivor, so the charge only has to cover
    /// the growth until then.
    pub fn charge(&mut self, handle: GcRef, extra: usize) -> Result<(), AllocError> {
        if extra == 0 {
            return Ok(());
        }
        self.check_limit(extra)?;
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return Ok(());
        };
        if slot.generation == handle.generation && slot.object.is_some() {
            slot.size += extra;
            self.bytes += extra;
        }
        Ok(())
    }

    fn check_limit(&self, size: usize) -> Result<(), AllocError> {
        match self.config.heap_limit {
            Some(limit) if self.bytes.saturating_add(size) > limit => Err(AllocError::HeapLimit {
                requested: size,
                in_use: self.bytes,
                limit,
            }),
            _ => Ok(()),
        }
    }

    #[inline]
    fn slot(&self, handle: GcRef) -> Option<&GcSlot> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_ref()?;
        Some(slot)
    }

    #[inline]
    pub fn get(&self, handle: GcRef) -> Option<&HeapObject> {
        self.slot(handle)?.object.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: GcRef) -> Option<&mut HeapObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_mut()
    }

    #[inline]
    pub fn kind(&self, handle: GcRef) -> Option<ObjectKind> {
        self.get(handle).map(HeapObject::kind)
    }

    /// Whether `handle` still refers to a live object.
    #[inline]
    pub fn contains(&self, handle: GcRef) -> bool {
        self.slot(handle).is_some()
    }

    /// Mark an object reachable and queue it for tracing.
    pub fn mark_gray(&mut self, handle: GcRef) {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return;
        };
        if slot.generation != handle.generation || slot.object.is_none() || slot.marked {
            return;
        }
        slot.marked = true;
        self.gray.push(handle);
    }

    #[inline]
    pub fn mark_value(&mut self, value: Value) {
        if let Value::Object(r) = value {
            self.mark_gray(r);
        }
    }

    /// Trace everything reachable from the marked roots and free the rest.
    pub fn collect(&mut self) -> CollectStats {
        let objects_before = self.live;
        let bytes_before = self.bytes;

        let mut children = Vec::new();
        while let Some(handle) = self.gray.pop() {
            if let Some(object) = self.get(handle) {
                scan_object(object, &mut children);
            }
            for child in children.drain(..) {
                self.mark_gray(child);
            }
        }

        let mut live = 0;
        let mut bytes = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(object) = &slot.object else {
                continue;
            };
            if slot.marked {
                slot.marked = false;
                slot.size = object.heap_size();
                live += 1;
                bytes += slot.size;
            } else {
                slot.object = None;
                slot.size = 0;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }

        self.live = live;
        self.bytes = bytes;
        let grown = bytes.saturating_add(bytes / 100 * self.config.growth_percent);
        self.next_gc = grown.max(self.config.initial_threshold);

        CollectStats {
            objects_before,
            objects_after: live,
            bytes_before,
            bytes_after: bytes,
        }
    }

    /// Number of live objects.
    #[inline]
    pub fn object_count(&self) -> usize {
        self.live
    }

    /// Bytes accounted to live objects.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.bytes
    }

    // === Typed accessors ===

    /// Hash of a value used as a dictionary key.
    pub fn hash_value(&self, value: Value) -> u32 {
        match value {
            Value::Null => 0,
            Value::Integer(i) => crate::hash::hash_integer(i),
            Value::Object(r) => match self.get(r) {
                Some(HeapObject::String(s)) => s.hash(),
                _ => crate::hash::hash_integer(((r.index as i64) << 32) | r.generation as i64),
            },
        }
    }

    /// Key equality: identity, or content equality between two strings.
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        if a == b {
            return true;
        }
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => match (self.get(x), self.get(y)) {
                (Some(HeapObject::String(x)), Some(HeapObject::String(y))) => x == y,
                _ => false,
            },
            _ => false,
        }
    }
}

impl Default for Gc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ListObj, StringObj};

    fn string(gc: &mut Gc, s: &str) -> GcRef {
        gc.alloc(HeapObject::String(StringObj::new(s.as_bytes()))).unwrap()
    }

    #[test]
    fn test_alloc_and_get() {
        let mut gc = Gc::new();
        let s = string(&mut gc, "hello");
        assert_eq!(gc.kind(s), Some(ObjectKind::String));
        assert_eq!(gc.object_count(), 1);
        assert!(gc.total_bytes() > 0);
    }

    #[test]
    fn test_collect_reclaims_unmarked() {
        let mut gc = Gc::new();
        let keep = string(&mut gc, "keep");
        let drop = string(&mut gc, "drop");

        gc.mark_gray(keep);
        let stats = gc.collect();

        assert_eq!(stats.objects_before, 2);
        assert_eq!(stats.objects_after, 1);
        assert!(gc.contains(keep));
        assert!(!gc.contains(drop));
    }

    #[test]
    fn test_collect_traces_children() {
        let mut gc = Gc::new();
        let item = string(&mut gc, "item");
        let mut list = ListObj::new();
        list.push(Value::Object(item));
        let list = gc.alloc(HeapObject::List(list)).unwrap();

        gc.mark_gray(list);
        gc.collect();

        assert!(gc.contains(list));
        assert!(gc.contains(item));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut gc = Gc::new();
        let old = string(&mut gc, "old");
        gc.collect();
        let new = string(&mut gc, "new");

        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(gc.get(old).is_none());
        assert!(gc.get(new).is_some());
    }

    #[test]
    fn test_heap_limit() {
        let mut gc = Gc::with_config(GcConfig {
            heap_limit: Some(64),
            ..GcConfig::default()
        });
        let big = vec![b'x'; 128];
        let err = gc.alloc(HeapObject::String(StringObj::new(&big))).unwrap_err();
        assert!(matches!(err, AllocError::HeapLimit { limit: 64, .. }));
        assert_eq!(gc.object_count(), 0);
    }

    #[test]
    fn test_charge_counts_growth() {
        let mut gc = Gc::with_config(GcConfig {
            heap_limit: Some(4096),
            ..GcConfig::default()
        });
        let s = string(&mut gc, "grow");
        let before = gc.total_bytes();

        gc.charge(s, 100).unwrap();
        assert_eq!(gc.total_bytes(), before + 100);

        let err = gc.charge(s, 4096).unwrap_err();
        assert!(matches!(err, AllocError::HeapLimit { requested: 4096, .. }));
        assert_eq!(gc.total_bytes(), before + 100);

        gc.mark_gray(s);
        gc.collect();
        assert_eq!(gc.total_bytes(), before);
    }

    #[test]
    fn test_charge_stale_handle_is_ignored() {
        let mut gc = Gc::new();
        let s = string(&mut gc, "gone");
        gc.collect();
        gc.charge(s, 64).unwrap();
        assert_eq!(gc.total_bytes(), 0);
    }

    #[test]
    fn test_string_key_equality() {
        let mut gc = Gc::new();
        let a = string(&mut gc, "key");
        let b = string(&mut gc, "key");
        let c = string(&mut gc, "other");

        assert!(gc.values_equal(Value::Object(a), Value::Object(b)));
        assert!(!gc.values_equal(Value::Object(a), Value::Object(c)));
        assert_eq!(gc.hash_value(Value::Object(a)), gc.hash_value(Value::Object(b)));
        assert!(!gc.values_equal(Value::Integer(1), Value::Null));
    }
}
