//! GC object scanning by kind.

use crate::gc::GcRef;
use crate::objects::{DictEntry, HeapObject};
use crate::value::Value;

#[inline]
fn push_value(out: &mut Vec<GcRef>, value: Value) {
    if let Value::Object(r) = value {
        out.push(r);
    }
}

/// Collect the heap references held directly by `object`.
pub fn scan_object(object: &HeapObject, out: &mut Vec<GcRef>) {
    match object {
        HeapObject::String(_) | HeapObject::Range(_) | HeapObject::Fiber(_) | HeapObject::Foreign(_) => {}

        HeapObject::List(list) => {
            for &value in list.as_slice() {
                push_value(out, value);
            }
        }

        HeapObject::Dict(dict) => {
            for entry in dict.entries() {
                if let DictEntry::Occupied { key, value, .. } = *entry {
                    push_value(out, key);
                    push_value(out, value);
                }
            }
        }

        HeapObject::Module(module) => {
            out.push(module.name);
            out.extend(module.path);
            out.push(module.variables);
        }

        HeapObject::Class(class) => {
            out.extend(class.name);
            out.extend(class.superclass);
            out.push(class.methods);
        }

        HeapObject::Function(func) => {
            out.extend(func.name);
            out.extend(func.module);
        }

        HeapObject::Closure(closure) => {
            out.push(closure.function);
            out.extend(closure.upvalues.iter().copied());
        }

        HeapObject::Instance(instance) => {
            out.push(instance.class);
            for &field in &instance.fields {
                push_value(out, field);
            }
        }

        HeapObject::Upvalue(upvalue) => push_value(out, upvalue.value),
    }
}
