//! Stack management, index resolution and value primitives.

use ck_runtime::objects::{ClosureObj, FunctionObj, RangeObj};
use ck_runtime::HeapObject;
use ck_vm::{ApiType, Value, Vm, VmConfig, VmError};
use pretty_assertions::assert_eq;

fn vm_with_stack(slots: usize) -> Vm {
    let mut vm = Vm::new();
    vm.ensure_stack(slots).unwrap();
    vm
}

fn integers(vm: &Vm) -> Vec<i64> {
    (0..vm.stack_count() as isize).map(|i| vm.get_integer(i)).collect()
}

#[test]
fn test_stack_size_before_and_after_fiber() {
    let mut vm = Vm::new();
    assert_eq!(vm.stack_size(), 0);
    assert_eq!(vm.stack_count(), 0);
    assert!(!vm.has_fiber());

    vm.ensure_stack(4).unwrap();
    assert!(vm.has_fiber());
    assert_eq!(vm.stack_size(), 64);
    assert_eq!(vm.stack_count(), 0);
}

#[test]
fn test_ensure_stack_grows_and_keeps_values() {
    let mut vm = Vm::with_config(VmConfig::new().with_initial_stack_slots(4));
    vm.ensure_stack(4).unwrap();
    assert_eq!(vm.stack_size(), 4);
    for i in 0..4 {
        vm.push_integer(i);
    }

    vm.ensure_stack(1).unwrap();
    assert_eq!(vm.stack_size(), 8);
    vm.push_integer(4);
    assert_eq!(integers(&vm), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_ensure_stack_overflow() {
    let config = VmConfig::new()
        .with_initial_stack_slots(4)
        .with_max_stack_slots(8);
    let mut vm = Vm::with_config(config);
    vm.ensure_stack(8).unwrap();
    assert_eq!(vm.stack_size(), 8);

    let err = vm.ensure_stack(9).unwrap_err();
    assert!(matches!(
        err,
        VmError::StackOverflow {
            requested: 9,
            limit: 8
        }
    ));
    assert_eq!(vm.stack_size(), 8);
}

#[test]
fn test_index_resolution_without_frame() {
    let mut vm = vm_with_stack(3);
    vm.push_integer(1);
    vm.push_integer(2);
    vm.push_integer(3);

    assert_eq!(vm.get_integer(0), 1);
    assert_eq!(vm.get_integer(2), 3);
    assert_eq!(vm.get_integer(-1), 3);
    assert_eq!(vm.get_integer(-3), 1);
}

fn add_frame_args(vm: &mut Vm) {
    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.stack_size(), 63);
    assert_eq!(vm.get_integer(0), 1);
    assert_eq!(vm.get_integer(-1), 2);
    let sum = vm.get_integer(0) + vm.get_integer(1);
    vm.push_integer(sum);
}

#[test]
fn test_index_resolution_in_frame() {
    let mut vm = vm_with_stack(4);
    vm.push_integer(100);
    vm.push_integer(1);
    vm.push_integer(2);

    vm.call_foreign(add_frame_args, 2);

    assert_eq!(integers(&vm), vec![100, 3]);
}

fn clear_frame(vm: &mut Vm) {
    vm.stack_pop(vm.stack_count());
}

#[test]
fn test_call_foreign_empty_frame_returns_null() {
    let mut vm = vm_with_stack(2);
    vm.push_integer(7);
    vm.push_integer(8);

    vm.call_foreign(clear_frame, 1);

    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.get_integer(0), 7);
    assert_eq!(vm.get_type(-1), ApiType::Null);
}

fn touch_caller_slot(vm: &mut Vm) {
    vm.get_integer(-2);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_frame_hides_caller_slots() {
    let mut vm = vm_with_stack(2);
    vm.push_integer(1);
    vm.push_integer(2);
    vm.call_foreign(touch_caller_slot, 1);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_index_past_top_panics() {
    let mut vm = vm_with_stack(1);
    vm.push_integer(1);
    vm.get_integer(1);
}

#[test]
#[should_panic(expected = "no active fiber")]
fn test_push_without_fiber_panics() {
    Vm::new().push_null();
}

#[test]
fn test_push_value_duplicates() {
    let mut vm = vm_with_stack(2);
    vm.push_integer(7);
    vm.push_value(0);
    assert_eq!(integers(&vm), vec![7, 7]);
}

#[test]
fn test_remove_insert_replace() {
    let mut vm = vm_with_stack(5);
    for i in 1..=4 {
        vm.push_integer(i);
    }

    vm.stack_remove(1);
    assert_eq!(integers(&vm), vec![1, 3, 4]);

    vm.stack_insert(0);
    assert_eq!(integers(&vm), vec![4, 1, 3]);

    vm.push_integer(9);
    vm.stack_replace(1);
    assert_eq!(integers(&vm), vec![4, 9, 3]);

    vm.push_integer(5);
    vm.stack_replace(-1);
    assert_eq!(integers(&vm), vec![4, 9, 3]);
}

#[test]
fn test_get_type() {
    let mut vm = vm_with_stack(8);
    vm.push_null();
    vm.push_integer(3);
    vm.push_string("s").unwrap();
    vm.push_list().unwrap();
    vm.push_dict().unwrap();
    vm.push_object(HeapObject::Function(FunctionObj {
        name: None,
        module: None,
        arity: 0,
    }))
    .unwrap();
    let function = vm.get_value(-1).as_object().unwrap();
    vm.push_object(HeapObject::Closure(ClosureObj {
        function,
        upvalues: Vec::new(),
    }))
    .unwrap();
    vm.push_object(HeapObject::Range(RangeObj {
        from: 0,
        to: 3,
        inclusive: false,
    }))
    .unwrap();

    let types: Vec<_> = (0..8).map(|i| vm.get_type(i)).collect();
    assert_eq!(
        types,
        vec![
            ApiType::Null,
            ApiType::Integer,
            ApiType::String,
            ApiType::List,
            ApiType::Dict,
            ApiType::Object,
            ApiType::Function,
            ApiType::Object,
        ]
    );
}

#[test]
fn test_get_integer_defaults_to_zero() {
    let mut vm = vm_with_stack(2);
    vm.push_string("12").unwrap();
    vm.push_null();
    assert_eq!(vm.get_integer(0), 0);
    assert_eq!(vm.get_integer(1), 0);
}

#[test]
fn test_stack_balance_on_type_mismatch() {
    let mut vm = vm_with_stack(8);
    vm.push_integer(0);

    vm.push_integer(1);
    vm.push_integer(2);
    vm.dict_set(0).unwrap();
    assert_eq!(vm.stack_count(), 1);

    vm.push_integer(1);
    vm.list_set(0, 0).unwrap();
    assert_eq!(vm.stack_count(), 1);

    vm.push_integer(1);
    assert_eq!(vm.dict_get(0), Value::Null);
    assert_eq!(vm.stack_count(), 2);
    vm.stack_pop(1);

    assert_eq!(vm.list_get(0, 0), Value::Null);
    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.dict_size(0), 0);
    assert_eq!(vm.list_size(0), 0);
}
