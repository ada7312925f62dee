use crate::error::ProxyError;
use crate::handle::{HeapId, ObjectId, StringId, SymbolId};
use crate::native::NativeCallFn;
use crate::property::{PropertyDescriptor, PropertyKey, PropertyKind};
use crate::string::JsString;
use crate::symbol::JsSymbol;
use crate::value::Value;
use std::collections::HashSet;

/// Hard upper bound on `[[Prototype]]` chain length.
///
/// [`Heap::object_set_prototype`] rejects cycles, so chains created through this crate's API
/// cannot be circular; the bound still guards every traversal against degenerate, extremely deep
/// chains.
pub const MAX_PROTOTYPE_CHAIN: usize = 10_000;

/// An arena owning every allocated string, symbol, object and native function.
///
/// Allocations are addressed by `Copy` handles ([`ObjectId`], [`StringId`], [`SymbolId`]).
/// Slots are never freed individually; everything is released when the heap is dropped. Public
/// APIs that dereference handles validate them and return [`ProxyError::InvalidHandle`] for
/// out-of-bounds or mistyped handles.
#[derive(Default)]
pub struct Heap {
  slots: Vec<HeapObject>,
  next_symbol_id: u64,
}

impl Heap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live allocations (of any kind).
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  fn alloc(&mut self, obj: HeapObject) -> Result<HeapId, ProxyError> {
    if self.slots.len() >= u32::MAX as usize {
      return Err(ProxyError::OutOfMemory);
    }
    // Fallible growth: hostile allocation patterns surface as an error instead of aborting the
    // host process.
    self.slots.try_reserve(1).map_err(|_| ProxyError::OutOfMemory)?;
    let id = HeapId(self.slots.len() as u32);
    self.slots.push(obj);
    Ok(id)
  }

  fn get_heap_object(&self, id: HeapId) -> Result<&HeapObject, ProxyError> {
    self.slots.get(id.0 as usize).ok_or(ProxyError::InvalidHandle)
  }

  fn get_heap_object_mut(&mut self, id: HeapId) -> Result<&mut HeapObject, ProxyError> {
    self.slots.get_mut(id.0 as usize).ok_or(ProxyError::InvalidHandle)
  }

  /// Allocates a JavaScript string on the heap.
  pub fn alloc_string(&mut self, s: &str) -> Result<StringId, ProxyError> {
    Ok(StringId(self.alloc(HeapObject::String(JsString::new(s)))?))
  }

  /// Allocates a JavaScript symbol on the heap.
  pub fn alloc_symbol(&mut self, description: Option<&str>) -> Result<SymbolId, ProxyError> {
    let description = match description {
      Some(s) => Some(self.alloc_string(s)?),
      None => None,
    };
    let id = self.next_symbol_id;
    self.next_symbol_id = self.next_symbol_id.wrapping_add(1);
    Ok(SymbolId(self.alloc(HeapObject::Symbol(JsSymbol::new(id, description)))?))
  }

  /// Allocates an empty ordinary object with no `[[Prototype]]`.
  pub fn alloc_object(&mut self) -> Result<ObjectId, ProxyError> {
    self.alloc_object_with_prototype(None)
  }

  /// Allocates an empty ordinary object with the provided `[[Prototype]]`.
  pub fn alloc_object_with_prototype(
    &mut self,
    prototype: Option<ObjectId>,
  ) -> Result<ObjectId, ProxyError> {
    if let Some(proto) = prototype {
      let _ = self.get_object_base(proto)?;
    }
    let obj = HeapObject::Object(JsObject {
      base: ObjectBase::new(prototype),
    });
    Ok(ObjectId(self.alloc(obj)?))
  }

  /// Allocates an ordinary object with the provided `[[Prototype]]` and own properties.
  ///
  /// Properties are stored in the order given, which becomes their insertion order for
  /// enumeration.
  pub fn alloc_object_with_properties(
    &mut self,
    prototype: Option<ObjectId>,
    props: &[(PropertyKey, PropertyDescriptor)],
  ) -> Result<ObjectId, ProxyError> {
    let obj = self.alloc_object_with_prototype(prototype)?;
    for (key, desc) in props {
      self.define_property(obj, *key, *desc)?;
    }
    Ok(obj)
  }

  /// Allocates a native function object.
  ///
  /// The result is callable via [`Heap::call`] and carries JS-shaped `name` and `length` own
  /// properties (non-writable, non-enumerable, configurable).
  pub fn alloc_native_function(
    &mut self,
    call: NativeCallFn,
    name: &str,
    length: u32,
  ) -> Result<ObjectId, ProxyError> {
    let name = self.alloc_string(name)?;
    let name_key = PropertyKey::String(self.alloc_string("name")?);
    let length_key = PropertyKey::String(self.alloc_string("length")?);

    let func = HeapObject::Function(JsFunction {
      base: ObjectBase::new(None),
      call,
    });
    let obj = ObjectId(self.alloc(func)?);

    let desc = |value: Value| PropertyDescriptor {
      enumerable: false,
      configurable: true,
      kind: PropertyKind::Data {
        value,
        writable: false,
      },
    };
    self.define_property(obj, name_key, desc(Value::String(name)))?;
    self.define_property(obj, length_key, desc(Value::Number(length as f64)))?;
    Ok(obj)
  }

  /// Gets the string contents for `s`.
  pub fn get_string(&self, s: StringId) -> Result<&JsString, ProxyError> {
    match self.get_heap_object(s.0)? {
      HeapObject::String(s) => Ok(s),
      _ => Err(ProxyError::InvalidHandle),
    }
  }

  /// Gets the (optional) description for `sym`.
  pub fn get_symbol_description(&self, sym: SymbolId) -> Result<Option<StringId>, ProxyError> {
    match self.get_heap_object(sym.0)? {
      HeapObject::Symbol(sym) => Ok(sym.description()),
      _ => Err(ProxyError::InvalidHandle),
    }
  }

  /// Returns the debug/introspection id for `sym`.
  pub fn get_symbol_id(&self, sym: SymbolId) -> Result<u64, ProxyError> {
    match self.get_heap_object(sym.0)? {
      HeapObject::Symbol(sym) => Ok(sym.id()),
      _ => Err(ProxyError::InvalidHandle),
    }
  }

  /// Returns `true` if `obj` currently points to a live object allocation.
  pub fn is_valid_object(&self, obj: ObjectId) -> bool {
    matches!(
      self.get_heap_object(obj.0),
      Ok(HeapObject::Object(_) | HeapObject::Function(_))
    )
  }

  /// Returns `true` if `value` is callable (i.e. has an ECMAScript `[[Call]]` internal method).
  pub fn is_callable(&self, value: Value) -> Result<bool, ProxyError> {
    match value {
      Value::Object(obj) => match self.get_heap_object(obj.0)? {
        HeapObject::Function(_) => Ok(true),
        _ => Ok(false),
      },
      _ => Ok(false),
    }
  }

  /// Calls `callee` with the provided `this` value and arguments.
  pub fn call(&mut self, callee: Value, this: Value, args: &[Value]) -> Result<Value, ProxyError> {
    let Value::Object(obj) = callee else {
      return Err(ProxyError::NotCallable);
    };
    let call = match self.get_heap_object(obj.0)? {
      HeapObject::Function(f) => f.call,
      _ => return Err(ProxyError::NotCallable),
    };
    call(self, this, args)
  }

  fn get_object_base(&self, obj: ObjectId) -> Result<&ObjectBase, ProxyError> {
    match self.get_heap_object(obj.0)? {
      HeapObject::Object(o) => Ok(&o.base),
      HeapObject::Function(f) => Ok(&f.base),
      _ => Err(ProxyError::InvalidHandle),
    }
  }

  fn get_object_base_mut(&mut self, obj: ObjectId) -> Result<&mut ObjectBase, ProxyError> {
    match self.get_heap_object_mut(obj.0)? {
      HeapObject::Object(o) => Ok(&mut o.base),
      HeapObject::Function(f) => Ok(&mut f.base),
      _ => Err(ProxyError::InvalidHandle),
    }
  }

  /// Gets an object's `[[Prototype]]`.
  pub fn object_prototype(&self, obj: ObjectId) -> Result<Option<ObjectId>, ProxyError> {
    Ok(self.get_object_base(obj)?.prototype)
  }

  /// Sets an object's `[[Prototype]]`.
  ///
  /// Rejects mutations that would introduce a cycle in the `[[Prototype]]` chain.
  pub fn object_set_prototype(
    &mut self,
    obj: ObjectId,
    prototype: Option<ObjectId>,
  ) -> Result<(), ProxyError> {
    // Validate `obj` early so we don't silently accept stale handles.
    let _ = self.get_object_base(obj)?;

    // Direct self-cycle.
    if prototype == Some(obj) {
      return Err(ProxyError::PrototypeCycle);
    }

    // Reject indirect cycles by walking `prototype`'s chain and checking whether it contains
    // `obj`. Also guard against hostile chains (very deep or cyclic) even if an invariant was
    // violated.
    let mut current = prototype;
    let mut steps = 0usize;
    let mut visited: HashSet<ObjectId> = HashSet::new();
    while let Some(p) = current {
      if steps >= MAX_PROTOTYPE_CHAIN {
        return Err(ProxyError::PrototypeChainTooDeep);
      }
      steps += 1;

      if !visited.insert(p) {
        return Err(ProxyError::PrototypeCycle);
      }
      if p == obj {
        return Err(ProxyError::PrototypeCycle);
      }

      current = self.object_prototype(p)?;
    }

    self.get_object_base_mut(obj)?.prototype = prototype;
    Ok(())
  }

  /// ECMAScript `[[IsExtensible]]` for ordinary objects.
  pub fn object_is_extensible(&self, obj: ObjectId) -> Result<bool, ProxyError> {
    Ok(self.get_object_base(obj)?.extensible)
  }

  /// ECMAScript `[[PreventExtensions]]` for ordinary objects. Always succeeds.
  pub fn object_prevent_extensions(&mut self, obj: ObjectId) -> Result<bool, ProxyError> {
    self.get_object_base_mut(obj)?.extensible = false;
    Ok(true)
  }

  /// Gets an own property descriptor from an object (ECMAScript `[[GetOwnProperty]]`).
  pub fn object_get_own_property(
    &self,
    obj: ObjectId,
    key: &PropertyKey,
  ) -> Result<Option<PropertyDescriptor>, ProxyError> {
    let base = self.get_object_base(obj)?;
    for prop in base.properties.iter() {
      if self.property_key_eq(&prop.key, key) {
        return Ok(Some(prop.desc));
      }
    }
    Ok(None)
  }

  /// Removes an own property. Returns whether an entry was removed.
  pub(crate) fn object_delete_own_property(
    &mut self,
    obj: ObjectId,
    key: &PropertyKey,
  ) -> Result<bool, ProxyError> {
    let idx = {
      let base = self.get_object_base(obj)?;
      base
        .properties
        .iter()
        .position(|prop| self.property_key_eq(&prop.key, key))
    };
    let Some(idx) = idx else {
      return Ok(false);
    };
    self.get_object_base_mut(obj)?.properties.remove(idx);
    Ok(true)
  }

  /// Writes a fully-formed own property, replacing any existing entry for `key` in place.
  ///
  /// This is raw storage: extensibility and descriptor-compatibility checks belong to
  /// [`Heap::ordinary_define_own_property`].
  pub(crate) fn define_property(
    &mut self,
    obj: ObjectId,
    key: PropertyKey,
    desc: PropertyDescriptor,
  ) -> Result<(), ProxyError> {
    let existing = {
      let base = self.get_object_base(obj)?;
      base
        .properties
        .iter()
        .position(|prop| self.property_key_eq(&prop.key, &key))
    };
    let base = self.get_object_base_mut(obj)?;
    match existing {
      Some(idx) => {
        // Replacing a property keeps its position in insertion order.
        base.properties[idx] = PropertyEntry { key, desc };
      }
      None => {
        base
          .properties
          .try_reserve(1)
          .map_err(|_| ProxyError::OutOfMemory)?;
        base.properties.push(PropertyEntry { key, desc });
      }
    }
    Ok(())
  }

  /// Returns the own property keys in raw insertion order (no index/string/symbol reordering).
  pub(crate) fn object_property_keys(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ProxyError> {
    Ok(self.get_object_base(obj)?.properties.iter().map(|prop| prop.key).collect())
  }
}

enum HeapObject {
  String(JsString),
  Symbol(JsSymbol),
  Object(JsObject),
  Function(JsFunction),
}

struct ObjectBase {
  prototype: Option<ObjectId>,
  extensible: bool,
  properties: Vec<PropertyEntry>,
}

impl ObjectBase {
  fn new(prototype: Option<ObjectId>) -> Self {
    Self {
      prototype,
      extensible: true,
      properties: Vec::new(),
    }
  }
}

struct JsObject {
  base: ObjectBase,
}

struct JsFunction {
  base: ObjectBase,
  call: NativeCallFn,
}

#[derive(Clone, Copy)]
struct PropertyEntry {
  key: PropertyKey,
  desc: PropertyDescriptor,
}
