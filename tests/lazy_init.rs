use lazy_proxy_js::{Heap, LazyProxy, PropertyDescriptorPatch, PropertyKey, ProxyError, Value};
use std::cell::Cell;
use std::rc::Rc;

fn counting_factory(calls: &Rc<Cell<u32>>) -> impl FnMut(&mut Heap) -> Result<lazy_proxy_js::ObjectId, ProxyError> + 'static {
  let calls = Rc::clone(calls);
  move |heap: &mut Heap| {
    calls.set(calls.get() + 1);
    let obj = heap.alloc_object()?;
    let key = PropertyKey::from_string(heap.alloc_string("value")?);
    heap.create_data_property(obj, key, Value::Number(10.0))?;
    Ok(obj)
  }
}

#[test]
fn factory_is_not_invoked_at_construction() -> Result<(), ProxyError> {
  let mut heap = Heap::new();
  let calls = Rc::new(Cell::new(0u32));
  let mut proxy = LazyProxy::new(counting_factory(&calls));

  assert_eq!(calls.get(), 0);

  // First access triggers creation.
  let key = PropertyKey::from_string(heap.alloc_string("value")?);
  assert_eq!(proxy.get(&mut heap, &key)?, Value::Number(10.0));
  assert_eq!(calls.get(), 1);

  Ok(())
}

#[test]
fn factory_is_not_invoked_by_debug_formatting() -> Result<(), ProxyError> {
  let calls = Rc::new(Cell::new(0u32));
  let proxy = LazyProxy::new(counting_factory(&calls));

  let rendered = format!("{proxy:?}");
  assert!(rendered.contains("initialized: false"));
  assert_eq!(calls.get(), 0);

  Ok(())
}

#[test]
fn factory_runs_once_regardless_of_operation_count_or_kind() -> Result<(), ProxyError> {
  let mut heap = Heap::new();
  let calls = Rc::new(Cell::new(0u32));
  let mut proxy = LazyProxy::new(counting_factory(&calls));

  let value_key = PropertyKey::from_string(heap.alloc_string("value")?);
  let other_key = PropertyKey::from_string(heap.alloc_string("other")?);

  assert_eq!(proxy.get(&mut heap, &value_key)?, Value::Number(10.0));
  assert_eq!(proxy.get(&mut heap, &value_key)?, Value::Number(10.0));
  assert!(proxy.set(&mut heap, other_key, Value::Bool(true))?);
  assert!(proxy.has(&mut heap, &value_key)?);
  assert!(proxy.get_own_property_descriptor(&mut heap, &value_key)?.is_some());
  assert_eq!(proxy.own_keys(&mut heap)?.len(), 2);
  let defined_key = PropertyKey::from_string(heap.alloc_string("defined")?);
  assert!(proxy.define_property(
    &mut heap,
    defined_key,
    PropertyDescriptorPatch {
      value: Some(Value::Number(1.0)),
      writable: Some(true),
      enumerable: Some(true),
      configurable: Some(true),
      ..Default::default()
    },
  )?);
  assert_eq!(proxy.get_prototype_of(&mut heap)?, None);
  assert!(proxy.is_extensible(&mut heap)?);
  assert!(proxy.delete(&mut heap, &other_key)?);
  assert!(proxy.prevent_extensions(&mut heap)?);

  assert_eq!(calls.get(), 1);
  Ok(())
}

#[test]
fn write_then_read_requires_a_single_factory_invocation() -> Result<(), ProxyError> {
  let mut heap = Heap::new();
  let calls = Rc::new(Cell::new(0u32));
  let mut proxy = LazyProxy::new(counting_factory(&calls));

  // The underlying object is created on the first write.
  let key = PropertyKey::from_string(heap.alloc_string("b")?);
  let hello = Value::String(heap.alloc_string("hello")?);
  assert!(proxy.set(&mut heap, key, hello)?);
  assert_eq!(calls.get(), 1);

  assert_eq!(proxy.get(&mut heap, &key)?, hello);
  assert_eq!(calls.get(), 1);

  Ok(())
}
