//! Tagged values.

use crate::gc::GcRef;

/// A value as stored in stack slots, list elements and dictionary entries.
///
/// Values are `Copy`. Equality is identity: two `Object` values are equal only
/// when they reference the same heap object. Dictionary keys use
/// [`Gc::values_equal`](crate::Gc::values_equal) instead, which also compares
/// string contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Object(GcRef),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<GcRef> {
        match *self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<GcRef> for Value {
    fn from(r: GcRef) -> Self {
        Value::Object(r)
    }
}

impl From<Option<GcRef>> for Value {
    fn from(r: Option<GcRef>) -> Self {
        r.map_or(Value::Null, Value::Object)
    }
}
