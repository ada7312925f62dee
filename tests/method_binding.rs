use lazy_proxy_js::{Heap, LazyProxy, PropertyKey, ProxyError, Value};
use std::cell::Cell;
use std::rc::Rc;

fn inc(heap: &mut Heap, this: Value, _args: &[Value]) -> Result<Value, ProxyError> {
  let Value::Object(obj) = this else {
    return Err(ProxyError::TypeError("inc called on a non-object receiver"));
  };
  let key = PropertyKey::from_string(heap.alloc_string("value")?);
  let Value::Number(n) = heap.ordinary_get(obj, &key, this)? else {
    return Err(ProxyError::TypeError("value is not a number"));
  };
  heap.ordinary_set(obj, key, Value::Number(n + 1.0), this)?;
  Ok(Value::Undefined)
}

fn greet(heap: &mut Heap, _this: Value, _args: &[Value]) -> Result<Value, ProxyError> {
  Ok(Value::String(heap.alloc_string("hi")?))
}

#[test]
fn method_mutation_via_receiver_is_visible_through_the_proxy() -> Result<(), ProxyError> {
  let mut heap = Heap::new();
  let calls = Rc::new(Cell::new(0u32));
  let counter = Rc::clone(&calls);
  let mut proxy = LazyProxy::new(move |heap: &mut Heap| {
    counter.set(counter.get() + 1);
    let obj = heap.alloc_object()?;
    let value_key = PropertyKey::from_string(heap.alloc_string("value")?);
    heap.create_data_property(obj, value_key, Value::Number(5.0))?;
    let inc_fn = heap.alloc_native_function(inc, "inc", 0)?;
    let inc_key = PropertyKey::from_string(heap.alloc_string("inc")?);
    heap.create_data_property(obj, inc_key, Value::Object(inc_fn))?;
    Ok(obj)
  });

  let inc_key = PropertyKey::from_string(heap.alloc_string("inc")?);
  proxy.call_method(&mut heap, &inc_key, &[])?;

  let value_key = PropertyKey::from_string(heap.alloc_string("value")?);
  assert_eq!(proxy.get(&mut heap, &value_key)?, Value::Number(6.0));
  assert_eq!(calls.get(), 1);

  Ok(())
}

#[test]
fn inherited_methods_are_callable_through_the_proxy() -> Result<(), ProxyError> {
  let mut heap = Heap::new();

  let proto = heap.alloc_object()?;
  let greet_fn = heap.alloc_native_function(greet, "greet", 0)?;
  let greet_key = PropertyKey::from_string(heap.alloc_string("greet")?);
  heap.create_data_property(proto, greet_key, Value::Object(greet_fn))?;

  let mut proxy =
    LazyProxy::new(move |heap: &mut Heap| heap.alloc_object_with_prototype(Some(proto)));

  let key = PropertyKey::from_string(heap.alloc_string("greet")?);
  let Value::String(s) = proxy.call_method(&mut heap, &key, &[])? else {
    panic!("greet should return a string");
  };
  assert_eq!(heap.get_string(s)?.as_str(), "hi");

  Ok(())
}

#[test]
fn calling_a_non_callable_field_reports_not_callable() -> Result<(), ProxyError> {
  let mut heap = Heap::new();
  let mut proxy = LazyProxy::new(|heap: &mut Heap| {
    let obj = heap.alloc_object()?;
    let key = PropertyKey::from_string(heap.alloc_string("x")?);
    heap.create_data_property(obj, key, Value::Number(1.0))?;
    Ok(obj)
  });

  let key = PropertyKey::from_string(heap.alloc_string("x")?);
  assert_eq!(
    proxy.call_method(&mut heap, &key, &[]).unwrap_err(),
    ProxyError::NotCallable
  );

  Ok(())
}
