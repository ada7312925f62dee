use lazy_proxy_js::{Heap, PropertyKey, ProxyError, Value};

fn string_key_name(heap: &Heap, key: &PropertyKey) -> String {
  match key {
    PropertyKey::String(s) => heap.get_string(*s).unwrap().as_str().to_string(),
    PropertyKey::Symbol(_) => panic!("expected a string key"),
  }
}

#[test]
fn numbers_coerce_to_ecmascript_tostring() -> Result<(), ProxyError> {
  let mut heap = Heap::new();

  for (n, expected) in [
    (1.0, "1"),
    (42.0, "42"),
    (-0.0, "0"),
    (0.5, "0.5"),
    (f64::NAN, "NaN"),
    (f64::INFINITY, "Infinity"),
    (f64::NEG_INFINITY, "-Infinity"),
  ] {
    let key = heap.to_property_key(Value::Number(n))?;
    assert_eq!(string_key_name(&heap, &key), expected);
  }

  Ok(())
}

#[test]
fn strings_and_symbols_pass_through() -> Result<(), ProxyError> {
  let mut heap = Heap::new();

  let s = heap.alloc_string("plain")?;
  assert_eq!(heap.to_property_key(Value::String(s))?, PropertyKey::String(s));

  let sym = heap.alloc_symbol(Some("desc"))?;
  assert_eq!(heap.to_property_key(Value::Symbol(sym))?, PropertyKey::Symbol(sym));

  Ok(())
}

#[test]
fn primitives_and_objects_coerce_via_tostring() -> Result<(), ProxyError> {
  let mut heap = Heap::new();

  let key = heap.to_property_key(Value::Undefined)?;
  assert_eq!(string_key_name(&heap, &key), "undefined");
  let key = heap.to_property_key(Value::Null)?;
  assert_eq!(string_key_name(&heap, &key), "null");
  let key = heap.to_property_key(Value::Bool(false))?;
  assert_eq!(string_key_name(&heap, &key), "false");

  let obj = heap.alloc_object()?;
  let key = heap.to_property_key(Value::Object(obj))?;
  assert_eq!(string_key_name(&heap, &key), "[object Object]");

  Ok(())
}

#[test]
fn array_index_parsing_matches_own_key_ordering_rules() -> Result<(), ProxyError> {
  let mut heap = Heap::new();

  for (text, expected) in [
    ("0", Some(0)),
    ("1", Some(1)),
    ("4294967294", Some(u32::MAX - 1)),
    // `ToUint32(P) != 2^32-1` excludes the maximum.
    ("4294967295", None),
    ("4294967296", None),
    // No leading zeros (except the single "0").
    ("01", None),
    ("", None),
    ("1a", None),
    ("-1", None),
  ] {
    let s = heap.alloc_string(text)?;
    assert_eq!(heap.string_to_array_index(s)?, expected, "for {text:?}");
  }

  Ok(())
}
