//! Dictionary and list operations.

use ck_vm::{ApiType, Value, Vm};
use pretty_assertions::assert_eq;

fn vm_with(push: fn(&mut Vm) -> ck_vm::VmResult<()>) -> Vm {
    let mut vm = Vm::new();
    vm.ensure_stack(16).unwrap();
    push(&mut vm).unwrap();
    vm
}

fn dict_put_str(vm: &mut Vm, key: &str, value: i64) {
    vm.push_integer(value);
    vm.push_string(key).unwrap();
    vm.dict_set(0).unwrap();
}

/// Iterate the dictionary at slot 0 in slot order, returning each pair with
/// the cursor it was found at.
fn drain_dict_with_cursors(vm: &mut Vm) -> Vec<(String, i64, i64)> {
    let mut entries = Vec::new();
    vm.push_null();
    while vm.dict_iterate(0) {
        let key = vm.get_str(-2).unwrap().to_owned();
        entries.push((key, vm.get_integer(-1), vm.get_integer(-3)));
        vm.stack_pop(2);
    }
    assert_eq!(vm.get_type(-1), ApiType::Null);
    vm.stack_pop(1);
    assert!(entries.windows(2).all(|w| w[0].2 < w[1].2));
    entries
}

fn drain_dict(vm: &mut Vm) -> Vec<(String, i64)> {
    drain_dict_with_cursors(vm)
        .into_iter()
        .map(|(key, value, _)| (key, value))
        .collect()
}

#[test]
fn test_dict_set_and_iterate() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "a", 1);
    dict_put_str(&mut vm, "b", 2);
    assert_eq!(vm.stack_count(), 1);
    assert_eq!(vm.dict_size(0), 2);

    // FNV-1a puts "b" in slot 5 and "a" in slot 12 of a 16-slot table.
    assert_eq!(
        drain_dict_with_cursors(&mut vm),
        vec![("b".to_owned(), 2, 5), ("a".to_owned(), 1, 12)]
    );
    assert_eq!(vm.stack_count(), 1);
}

#[test]
fn test_dict_set_overwrites() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "a", 1);
    dict_put_str(&mut vm, "a", 5);
    assert_eq!(vm.dict_size(0), 1);
    assert_eq!(drain_dict(&mut vm), vec![("a".to_owned(), 5)]);
}

#[test]
fn test_dict_get_matches_string_content() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "key", 9);

    vm.push_string("key").unwrap();
    assert_eq!(vm.dict_get(0), Value::Integer(9));
    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.get_integer(-1), 9);

    vm.push_string("other").unwrap();
    assert_eq!(vm.dict_get(0), Value::Null);
    assert_eq!(vm.stack_count(), 3);
}

#[test]
fn test_dict_integer_and_null_keys() {
    let mut vm = vm_with(Vm::push_dict);
    vm.push_integer(10);
    vm.push_integer(1);
    vm.dict_set(0).unwrap();
    vm.push_integer(20);
    vm.push_null();
    vm.dict_set(0).unwrap();
    assert_eq!(vm.dict_size(0), 2);

    vm.push_integer(1);
    assert_eq!(vm.dict_get(0), Value::Integer(10));
    vm.push_null();
    assert_eq!(vm.dict_get(0), Value::Integer(20));
}

#[test]
fn test_dict_remove() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "a", 1);
    dict_put_str(&mut vm, "b", 2);

    vm.push_string("a").unwrap();
    assert!(vm.dict_remove(0));
    assert_eq!(vm.stack_count(), 1);
    assert_eq!(vm.dict_size(0), 1);

    vm.push_string("a").unwrap();
    assert!(!vm.dict_remove(0));
    assert_eq!(vm.stack_count(), 1);
    assert_eq!(drain_dict(&mut vm), vec![("b".to_owned(), 2)]);
}

#[test]
fn test_dict_iterate_empty() {
    let mut vm = vm_with(Vm::push_dict);
    vm.push_null();
    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.get_type(-1), ApiType::Null);
}

#[test]
fn test_dict_iterate_invalid_cursor_resets() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "a", 1);

    vm.push_integer(1 << 20);
    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.get_type(-1), ApiType::Null);

    vm.stack_pop(1);
    vm.push_integer(-1);
    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.get_type(-1), ApiType::Null);

    vm.stack_pop(1);
    vm.push_string("cursor").unwrap();
    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.get_type(-1), ApiType::Null);
    assert_eq!(vm.stack_count(), 2);
}

#[test]
fn test_dict_iterate_cursor_is_slot_position() {
    let mut vm = vm_with(Vm::push_dict);
    dict_put_str(&mut vm, "only", 1);
    vm.push_null();

    assert!(vm.dict_iterate(0));
    assert_eq!(vm.stack_count(), 4);
    assert_eq!(vm.get_type(1), ApiType::Integer);
    let slot = vm.get_integer(1);
    assert!(slot >= 0);
    vm.stack_pop(2);

    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.stack_count(), 2);
}

#[test]
fn test_dict_iterate_non_dict_leaves_cursor() {
    let mut vm = Vm::new();
    vm.ensure_stack(4).unwrap();
    vm.push_integer(5);
    vm.push_integer(3);
    assert!(!vm.dict_iterate(0));
    assert_eq!(vm.stack_count(), 2);
    assert_eq!(vm.get_integer(-1), 3);
}

#[test]
fn test_list_append_then_get() {
    let mut vm = vm_with(Vm::push_list);
    vm.push_integer(10);
    vm.list_set(0, 0).unwrap();
    assert_eq!(vm.list_size(0), 1);
    vm.push_integer(20);
    vm.list_set(0, 1).unwrap();
    assert_eq!(vm.list_size(0), 2);
    assert_eq!(vm.stack_count(), 1);

    assert_eq!(vm.list_get(0, -1), Value::Integer(20));
    assert_eq!(vm.get_integer(-1), 20);
    assert_eq!(vm.stack_count(), 2);
}

#[test]
fn test_list_get_range() {
    let mut vm = vm_with(Vm::push_list);
    for (i, v) in [1, 2, 3].into_iter().enumerate() {
        vm.push_integer(v);
        vm.list_set(0, i as isize).unwrap();
    }

    let got: Vec<Value> = [0, 2, -1, -3, 3, -4, 100]
        .into_iter()
        .map(|i| vm.list_get(0, i))
        .collect();
    assert_eq!(
        got,
        vec![
            Value::Integer(1),
            Value::Integer(3),
            Value::Integer(3),
            Value::Integer(1),
            Value::Null,
            Value::Null,
            Value::Null,
        ]
    );
}

#[test]
fn test_list_set_overwrites_and_discards() {
    let mut vm = vm_with(Vm::push_list);
    vm.push_integer(1);
    vm.list_set(0, 0).unwrap();
    vm.push_integer(2);
    vm.list_set(0, 1).unwrap();

    vm.push_integer(5);
    vm.list_set(0, -2).unwrap();
    vm.push_integer(6);
    vm.list_set(0, 1).unwrap();
    assert_eq!(vm.list_get(0, 0), Value::Integer(5));
    assert_eq!(vm.list_get(0, 1), Value::Integer(6));
    vm.stack_pop(2);

    vm.push_integer(7);
    vm.list_set(0, 3).unwrap();
    vm.push_integer(8);
    vm.list_set(0, -3).unwrap();
    assert_eq!(vm.list_size(0), 2);
    assert_eq!(vm.stack_count(), 1);
}

#[test]
fn test_list_holds_objects() {
    let mut vm = vm_with(Vm::push_list);
    vm.push_string("x").unwrap();
    vm.list_set(0, 0).unwrap();
    vm.list_get(0, 0);
    assert_eq!(vm.get_str(-1), Some("x"));
}
