use crate::error::ProxyError;
use crate::handle::{StringId, SymbolId};
use crate::heap::Heap;
use crate::value::Value;

/// A JavaScript property key (ECMAScript `PropertyKey`).
///
/// This mirrors ECMA-262's `PropertyKey` union: `String | Symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
  String(StringId),
  Symbol(SymbolId),
}

impl PropertyKey {
  pub fn from_string(value: StringId) -> Self {
    Self::String(value)
  }

  pub fn from_symbol(value: SymbolId) -> Self {
    Self::Symbol(value)
  }
}

/// A concrete property descriptor.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
  pub enumerable: bool,
  pub configurable: bool,
  pub kind: PropertyKind,
}

impl PropertyDescriptor {
  pub fn is_data_descriptor(&self) -> bool {
    matches!(self.kind, PropertyKind::Data { .. })
  }

  pub fn is_accessor_descriptor(&self) -> bool {
    matches!(self.kind, PropertyKind::Accessor { .. })
  }
}

/// The kind of property described by a [`PropertyDescriptor`].
#[derive(Debug, Clone, Copy)]
pub enum PropertyKind {
  Data { value: Value, writable: bool },
  Accessor { get: Value, set: Value },
}

/// A "partial" property descriptor patch used by `DefineProperty`-style operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyDescriptorPatch {
  pub enumerable: Option<bool>,
  pub configurable: Option<bool>,
  pub value: Option<Value>,
  pub writable: Option<bool>,
  pub get: Option<Value>,
  pub set: Option<Value>,
}

impl PropertyDescriptorPatch {
  /// Validates that this patch does not mix data and accessor descriptor fields.
  ///
  /// Per ECMAScript, a descriptor cannot be both a Data Descriptor and an Accessor Descriptor.
  pub fn validate(&self) -> Result<(), ProxyError> {
    if self.is_data_descriptor() && self.is_accessor_descriptor() {
      return Err(ProxyError::InvalidPropertyDescriptorPatch);
    }
    Ok(())
  }

  /// ECMAScript `IsDataDescriptor`.
  pub fn is_data_descriptor(&self) -> bool {
    self.value.is_some() || self.writable.is_some()
  }

  /// ECMAScript `IsAccessorDescriptor`.
  pub fn is_accessor_descriptor(&self) -> bool {
    self.get.is_some() || self.set.is_some()
  }

  /// ECMAScript `IsGenericDescriptor`.
  pub fn is_generic_descriptor(&self) -> bool {
    !self.is_data_descriptor() && !self.is_accessor_descriptor()
  }

  /// Returns `true` if the patch requests no change at all.
  pub fn is_empty(&self) -> bool {
    self.is_generic_descriptor() && self.enumerable.is_none() && self.configurable.is_none()
  }
}

impl Heap {
  /// Compare two property keys.
  ///
  /// - String keys compare by content.
  /// - Symbol keys compare by identity (handle equality).
  pub fn property_key_eq(&self, a: &PropertyKey, b: &PropertyKey) -> bool {
    match (a, b) {
      (PropertyKey::String(a), PropertyKey::String(b)) => {
        let Ok(a) = self.get_string(*a) else {
          return false;
        };
        let Ok(b) = self.get_string(*b) else {
          return false;
        };
        a.as_str() == b.as_str()
      }
      (PropertyKey::Symbol(a), PropertyKey::Symbol(b)) => a == b,
      _ => false,
    }
  }

  /// Attempts to parse `s` as an ECMAScript array index.
  ///
  /// This matches the `ToString(ToUint32(P)) === P` and `ToUint32(P) != 2^32-1` conditions used
  /// by `OrdinaryOwnPropertyKeys`.
  pub fn string_to_array_index(&self, s: StringId) -> Result<Option<u32>, ProxyError> {
    let s = self.get_string(s)?;
    let bytes = s.as_str().as_bytes();
    if bytes.is_empty() {
      return Ok(None);
    }

    // No leading zeros (except the single "0").
    if bytes.len() > 1 && bytes[0] == b'0' {
      return Ok(None);
    }

    let mut value: u64 = 0;
    for &b in bytes {
      if !b.is_ascii_digit() {
        return Ok(None);
      }
      value = match value
        .checked_mul(10)
        .and_then(|v| v.checked_add((b - b'0') as u64))
      {
        Some(v) => v,
        None => return Ok(None),
      };
      if value > u32::MAX as u64 {
        return Ok(None);
      }
    }

    // Exclude 2^32-1.
    if value == u32::MAX as u64 {
      return Ok(None);
    }
    Ok(Some(value as u32))
  }

  /// Attempts to parse `key` as an ECMAScript array index.
  pub fn property_key_to_array_index(&self, key: &PropertyKey) -> Result<Option<u32>, ProxyError> {
    match key {
      PropertyKey::String(s) => self.string_to_array_index(*s),
      PropertyKey::Symbol(_) => Ok(None),
    }
  }

  /// Convert a value to a property key (ECMAScript `ToPropertyKey`).
  ///
  /// `String`/`Symbol` values are returned directly; all other values go through [`Heap::to_string`].
  /// This is what makes computed, non-string keys (e.g. numeric indices) work.
  pub fn to_property_key(&mut self, value: Value) -> Result<PropertyKey, ProxyError> {
    match value {
      Value::String(s) => Ok(PropertyKey::String(s)),
      Value::Symbol(s) => Ok(PropertyKey::Symbol(s)),
      other => Ok(PropertyKey::String(self.to_string(other)?)),
    }
  }

  /// Minimal ECMAScript `ToString`, sufficient for property key coercion:
  /// - Objects stringify to `"[object Object]"` (no `ToPrimitive` / user `toString` invocation).
  /// - `ToString(Symbol)` throws a `TypeError`, per ECMA-262.
  pub fn to_string(&mut self, value: Value) -> Result<StringId, ProxyError> {
    match value {
      Value::Undefined => self.alloc_string("undefined"),
      Value::Null => self.alloc_string("null"),
      Value::Bool(true) => self.alloc_string("true"),
      Value::Bool(false) => self.alloc_string("false"),
      Value::Number(n) => {
        if n.is_nan() {
          self.alloc_string("NaN")
        } else if n.is_infinite() {
          if n.is_sign_negative() {
            self.alloc_string("-Infinity")
          } else {
            self.alloc_string("Infinity")
          }
        } else if n == 0.0 {
          // `ToString(-0)` is `"0"` in ECMAScript.
          self.alloc_string("0")
        } else {
          let mut buf = ryu::Buffer::new();
          let formatted = buf.format(n);
          // `ryu` formats `1.0` as `"1.0"`, but ECMAScript `ToString(1)` is `"1"`.
          let formatted = formatted.strip_suffix(".0").unwrap_or(formatted);
          self.alloc_string(formatted)
        }
      }
      Value::String(s) => Ok(s),
      Value::Symbol(_) => Err(ProxyError::TypeError(
        "Cannot convert a Symbol value to a string",
      )),
      Value::Object(_) => self.alloc_string("[object Object]"),
    }
  }
}
