use crate::error::ProxyError;
use crate::handle::ObjectId;
use crate::heap::{Heap, MAX_PROTOTYPE_CHAIN};
use crate::property::{PropertyDescriptor, PropertyDescriptorPatch, PropertyKey, PropertyKind};
use crate::value::Value;
use std::collections::HashSet;

impl Heap {
  /// Finds the first descriptor for `key` on `obj` or its `[[Prototype]]` chain.
  pub fn get_property(
    &self,
    obj: ObjectId,
    key: &PropertyKey,
  ) -> Result<Option<PropertyDescriptor>, ProxyError> {
    let mut current = Some(obj);
    let mut steps = 0usize;
    let mut visited: HashSet<ObjectId> = HashSet::new();

    while let Some(obj) = current {
      if steps >= MAX_PROTOTYPE_CHAIN {
        return Err(ProxyError::PrototypeChainTooDeep);
      }
      steps += 1;

      if !visited.insert(obj) {
        return Err(ProxyError::PrototypeCycle);
      }

      if let Some(desc) = self.object_get_own_property(obj, key)? {
        return Ok(Some(desc));
      }

      current = self.object_prototype(obj)?;
    }

    Ok(None)
  }

  /// ECMAScript `[[HasProperty]]` for ordinary objects (includes inherited properties).
  pub fn ordinary_has_property(&self, obj: ObjectId, key: &PropertyKey) -> Result<bool, ProxyError> {
    Ok(self.get_property(obj, key)?.is_some())
  }

  /// ECMAScript `[[Get]]` for ordinary objects.
  ///
  /// Accessor getters are invoked with `receiver` as `this`.
  pub fn ordinary_get(
    &mut self,
    obj: ObjectId,
    key: &PropertyKey,
    receiver: Value,
  ) -> Result<Value, ProxyError> {
    let Some(desc) = self.get_property(obj, key)? else {
      return Ok(Value::Undefined);
    };
    match desc.kind {
      PropertyKind::Data { value, .. } => Ok(value),
      PropertyKind::Accessor { get, .. } => {
        if matches!(get, Value::Undefined) {
          Ok(Value::Undefined)
        } else {
          self.call(get, receiver, &[])
        }
      }
    }
  }

  /// ECMAScript `[[Set]]` for ordinary objects.
  ///
  /// Accessor setters are invoked with `receiver` as `this`.
  pub fn ordinary_set(
    &mut self,
    obj: ObjectId,
    key: PropertyKey,
    value: Value,
    receiver: Value,
  ) -> Result<bool, ProxyError> {
    let own_desc = self.object_get_own_property(obj, &key)?;
    ordinary_set_with_own_descriptor(self, obj, key, value, receiver, own_desc)
  }

  /// ECMAScript `[[Delete]]` for ordinary objects.
  ///
  /// An absent property deletes successfully; a non-configurable one does not.
  pub fn ordinary_delete(&mut self, obj: ObjectId, key: &PropertyKey) -> Result<bool, ProxyError> {
    let Some(current) = self.object_get_own_property(obj, key)? else {
      return Ok(true);
    };

    if !current.configurable {
      return Ok(false);
    }

    let _ = self.object_delete_own_property(obj, key)?;
    Ok(true)
  }

  /// ECMAScript `[[OwnPropertyKeys]]` for ordinary objects.
  ///
  /// Orders keys as:
  /// 1. array index keys, in ascending numeric order,
  /// 2. other string keys, in insertion order,
  /// 3. symbol keys, in insertion order.
  pub fn ordinary_own_property_keys(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ProxyError> {
    let keys = self.object_property_keys(obj)?;

    let mut index_keys: Vec<(u32, PropertyKey)> = Vec::new();
    let mut string_keys: Vec<PropertyKey> = Vec::new();
    let mut symbol_keys: Vec<PropertyKey> = Vec::new();

    for key in keys {
      match key {
        PropertyKey::String(_) => match self.property_key_to_array_index(&key)? {
          Some(idx) => index_keys.push((idx, key)),
          None => string_keys.push(key),
        },
        PropertyKey::Symbol(_) => symbol_keys.push(key),
      }
    }

    index_keys.sort_by_key(|(idx, _)| *idx);

    let mut out = Vec::with_capacity(index_keys.len() + string_keys.len() + symbol_keys.len());
    out.extend(index_keys.into_iter().map(|(_, k)| k));
    out.extend(string_keys);
    out.extend(symbol_keys);
    Ok(out)
  }

  /// ECMAScript `[[DefineOwnProperty]]` for ordinary objects.
  pub fn ordinary_define_own_property(
    &mut self,
    obj: ObjectId,
    key: PropertyKey,
    desc: PropertyDescriptorPatch,
  ) -> Result<bool, ProxyError> {
    desc.validate()?;

    let current = self.object_get_own_property(obj, &key)?;
    let extensible = self.object_is_extensible(obj)?;

    validate_and_apply_property_descriptor(self, obj, key, extensible, desc, current)
  }

  /// ECMAScript `CreateDataProperty`: define a writable/enumerable/configurable data property.
  pub fn create_data_property(
    &mut self,
    obj: ObjectId,
    key: PropertyKey,
    value: Value,
  ) -> Result<bool, ProxyError> {
    self.ordinary_define_own_property(
      obj,
      key,
      PropertyDescriptorPatch {
        value: Some(value),
        writable: Some(true),
        enumerable: Some(true),
        configurable: Some(true),
        ..Default::default()
      },
    )
  }
}

fn validate_and_apply_property_descriptor(
  heap: &mut Heap,
  obj: ObjectId,
  key: PropertyKey,
  extensible: bool,
  desc: PropertyDescriptorPatch,
  current: Option<PropertyDescriptor>,
) -> Result<bool, ProxyError> {
  desc.validate()?;

  let Some(current_desc) = current else {
    if !extensible {
      return Ok(false);
    }

    // Create new property with default attributes for missing fields.
    let enumerable = desc.enumerable.unwrap_or(false);
    let configurable = desc.configurable.unwrap_or(false);
    let new_desc = if desc.is_accessor_descriptor() {
      PropertyDescriptor {
        enumerable,
        configurable,
        kind: PropertyKind::Accessor {
          get: desc.get.unwrap_or(Value::Undefined),
          set: desc.set.unwrap_or(Value::Undefined),
        },
      }
    } else {
      // Generic descriptors create data properties.
      PropertyDescriptor {
        enumerable,
        configurable,
        kind: PropertyKind::Data {
          value: desc.value.unwrap_or(Value::Undefined),
          writable: desc.writable.unwrap_or(false),
        },
      }
    };

    heap.define_property(obj, key, new_desc)?;
    return Ok(true);
  };

  // If `Desc` has no fields, no change is requested.
  if desc.is_empty() {
    return Ok(true);
  }

  // Non-configurable invariants.
  if !current_desc.configurable {
    if matches!(desc.configurable, Some(true)) {
      return Ok(false);
    }
    if let Some(enumerable) = desc.enumerable {
      if enumerable != current_desc.enumerable {
        return Ok(false);
      }
    }
  }

  let desc_is_generic = desc.is_generic_descriptor();
  let desc_is_data = desc.is_data_descriptor();
  let desc_is_accessor = desc.is_accessor_descriptor();

  let current_is_data = current_desc.is_data_descriptor();
  let current_is_accessor = current_desc.is_accessor_descriptor();

  // Reject kind switches when not configurable.
  if !current_desc.configurable && !desc_is_generic {
    if (current_is_data && desc_is_accessor) || (current_is_accessor && desc_is_data) {
      return Ok(false);
    }
  }

  if !desc_is_generic {
    match (&current_desc.kind, current_desc.configurable) {
      (PropertyKind::Data { value, writable }, false) if desc_is_data => {
        if !writable {
          if desc.writable == Some(true) {
            return Ok(false);
          }
          if let Some(new_value) = desc.value {
            if !new_value.same_value(*value, heap) {
              return Ok(false);
            }
          }
        }
      }
      (PropertyKind::Accessor { get, set }, false) if desc_is_accessor => {
        if let Some(new_get) = desc.get {
          if !new_get.same_value(*get, heap) {
            return Ok(false);
          }
        }
        if let Some(new_set) = desc.set {
          if !new_set.same_value(*set, heap) {
            return Ok(false);
          }
        }
      }
      _ => {}
    }
  }

  let new_desc = apply_descriptor_patch(current_desc, desc);
  heap.define_property(obj, key, new_desc)?;

  Ok(true)
}

fn apply_descriptor_patch(
  current: PropertyDescriptor,
  desc: PropertyDescriptorPatch,
) -> PropertyDescriptor {
  let enumerable = desc.enumerable.unwrap_or(current.enumerable);
  let configurable = desc.configurable.unwrap_or(current.configurable);

  if desc.is_generic_descriptor() {
    return PropertyDescriptor {
      enumerable,
      configurable,
      kind: current.kind,
    };
  }

  match (current.kind, desc.is_accessor_descriptor()) {
    (PropertyKind::Data { value, writable }, false) => PropertyDescriptor {
      enumerable,
      configurable,
      kind: PropertyKind::Data {
        value: desc.value.unwrap_or(value),
        writable: desc.writable.unwrap_or(writable),
      },
    },
    (PropertyKind::Accessor { get, set }, true) => PropertyDescriptor {
      enumerable,
      configurable,
      kind: PropertyKind::Accessor {
        get: desc.get.unwrap_or(get),
        set: desc.set.unwrap_or(set),
      },
    },
    // Kind conversions. Default values are per `ValidateAndApplyPropertyDescriptor`.
    (PropertyKind::Data { .. }, true) => PropertyDescriptor {
      enumerable,
      configurable,
      kind: PropertyKind::Accessor {
        get: desc.get.unwrap_or(Value::Undefined),
        set: desc.set.unwrap_or(Value::Undefined),
      },
    },
    (PropertyKind::Accessor { .. }, false) => PropertyDescriptor {
      enumerable,
      configurable,
      kind: PropertyKind::Data {
        value: desc.value.unwrap_or(Value::Undefined),
        writable: desc.writable.unwrap_or(false),
      },
    },
  }
}

fn ordinary_set_with_own_descriptor(
  heap: &mut Heap,
  obj: ObjectId,
  key: PropertyKey,
  value: Value,
  receiver: Value,
  own_desc: Option<PropertyDescriptor>,
) -> Result<bool, ProxyError> {
  let own_desc = match own_desc {
    Some(desc) => desc,
    None => match heap.object_prototype(obj)? {
      Some(parent) => return heap.ordinary_set(parent, key, value, receiver),
      None => PropertyDescriptor {
        enumerable: true,
        configurable: true,
        kind: PropertyKind::Data {
          value: Value::Undefined,
          writable: true,
        },
      },
    },
  };

  match own_desc.kind {
    PropertyKind::Data { writable, .. } => {
      if !writable {
        return Ok(false);
      }
      let Value::Object(receiver_obj) = receiver else {
        return Ok(false);
      };

      let existing_desc = heap.object_get_own_property(receiver_obj, &key)?;
      if let Some(existing_desc) = existing_desc {
        if existing_desc.is_accessor_descriptor() {
          return Ok(false);
        }
        let PropertyKind::Data {
          writable: receiver_writable,
          ..
        } = existing_desc.kind
        else {
          unreachable!("checked accessor above");
        };
        if !receiver_writable {
          return Ok(false);
        }

        return heap.ordinary_define_own_property(
          receiver_obj,
          key,
          PropertyDescriptorPatch {
            value: Some(value),
            ..Default::default()
          },
        );
      }

      heap.create_data_property(receiver_obj, key, value)
    }
    PropertyKind::Accessor { set, .. } => {
      if matches!(set, Value::Undefined) {
        return Ok(false);
      }
      heap.call(set, receiver, &[value])?;
      Ok(true)
    }
  }
}
