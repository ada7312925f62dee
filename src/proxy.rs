use crate::error::ProxyError;
use crate::handle::ObjectId;
use crate::heap::Heap;
use crate::property::{PropertyDescriptor, PropertyDescriptorPatch, PropertyKey};
use crate::value::Value;
use std::fmt;

/// The factory a [`LazyProxy`] defers to.
///
/// The `&mut Heap` parameter is the allocation context; beyond that the factory is zero-argument.
/// It is supplied exactly once, at proxy construction, and may have side effects. Returning
/// `ObjectId` guarantees the constructed instance is object-like.
pub type InstanceFactory = dyn FnMut(&mut Heap) -> Result<ObjectId, ProxyError>;

/// A deferred-construction forwarding proxy.
///
/// Wraps a factory and an initially-empty instance slot. Every operation first ensures the slot
/// is populated — invoking the factory on the first touch — then performs the identical
/// ordinary-object operation against the underlying instance and returns its result verbatim.
/// Once populated, the slot never changes: all operations observe and mutate the same instance.
///
/// # Initialization policy
///
/// The factory runs at most once *successfully*. If it fails, the error propagates unchanged to
/// whichever operation triggered initialization, the slot stays empty, and the next operation
/// retries the factory from scratch.
///
/// # Receiver binding
///
/// Methods reached via [`LazyProxy::call_method`], and accessors reached via
/// [`LazyProxy::get`]/[`LazyProxy::set`], run with `this` bound to the underlying instance —
/// never the proxy — so mutation they perform is visible through later proxy operations.
pub struct LazyProxy {
  factory: Box<InstanceFactory>,
  instance: Option<ObjectId>,
}

impl LazyProxy {
  /// Creates a proxy over `factory` without invoking it.
  pub fn new<F>(factory: F) -> Self
  where
    F: FnMut(&mut Heap) -> Result<ObjectId, ProxyError> + 'static,
  {
    Self {
      factory: Box::new(factory),
      instance: None,
    }
  }

  fn ensure_initialized(&mut self, heap: &mut Heap) -> Result<ObjectId, ProxyError> {
    if let Some(instance) = self.instance {
      return Ok(instance);
    }
    match (self.factory)(heap) {
      Ok(instance) => {
        tracing::debug!(object = instance.id().index(), "lazy instance constructed");
        self.instance = Some(instance);
        Ok(instance)
      }
      Err(err) => {
        tracing::debug!(error = %err, "lazy construction failed; slot left empty");
        Err(err)
      }
    }
  }

  /// `[[Get]]`: reads `key` from the instance, walking its `[[Prototype]]` chain. `undefined` if
  /// absent. Getters run with the instance as `this`.
  pub fn get(&mut self, heap: &mut Heap, key: &PropertyKey) -> Result<Value, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_get(instance, key, Value::Object(instance))
  }

  /// `[[Set]]`: writes `key` on the instance. Returns whether the write succeeded. Setters run
  /// with the instance as `this`.
  pub fn set(&mut self, heap: &mut Heap, key: PropertyKey, value: Value) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_set(instance, key, value, Value::Object(instance))
  }

  /// `[[Delete]]`: removes an own property. Returns whether the deletion succeeded (an absent
  /// property deletes successfully; a non-configurable one does not).
  pub fn delete(&mut self, heap: &mut Heap, key: &PropertyKey) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_delete(instance, key)
  }

  /// `[[HasProperty]]`: membership test, including inherited properties.
  pub fn has(&mut self, heap: &mut Heap, key: &PropertyKey) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_has_property(instance, key)
  }

  /// `[[OwnPropertyKeys]]`: own keys (enumerable or not) in the object model's native order —
  /// array index keys ascending, then string keys in insertion order, then symbol keys.
  pub fn own_keys(&mut self, heap: &mut Heap) -> Result<Vec<PropertyKey>, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_own_property_keys(instance)
  }

  /// `[[GetOwnProperty]]`: the own descriptor for `key`, exactly as the instance reports it.
  pub fn get_own_property_descriptor(
    &mut self,
    heap: &mut Heap,
    key: &PropertyKey,
  ) -> Result<Option<PropertyDescriptor>, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.object_get_own_property(instance, key)
  }

  /// `[[DefineOwnProperty]]`: applies `desc`. Returns whether the definition was accepted.
  pub fn define_property(
    &mut self,
    heap: &mut Heap,
    key: PropertyKey,
    desc: PropertyDescriptorPatch,
  ) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.ordinary_define_own_property(instance, key, desc)
  }

  /// `[[GetPrototypeOf]]`.
  pub fn get_prototype_of(&mut self, heap: &mut Heap) -> Result<Option<ObjectId>, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.object_prototype(instance)
  }

  /// `[[SetPrototypeOf]]`. Errors on prototype cycles, exactly as a direct mutation would.
  pub fn set_prototype_of(
    &mut self,
    heap: &mut Heap,
    prototype: Option<ObjectId>,
  ) -> Result<(), ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.object_set_prototype(instance, prototype)
  }

  /// `[[IsExtensible]]`.
  pub fn is_extensible(&mut self, heap: &mut Heap) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.object_is_extensible(instance)
  }

  /// `[[PreventExtensions]]`. Returns whether the object is now non-extensible (always `true`
  /// for ordinary objects).
  pub fn prevent_extensions(&mut self, heap: &mut Heap) -> Result<bool, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    heap.object_prevent_extensions(instance)
  }

  /// Reads `key` and invokes the resulting callable with `this` bound to the underlying
  /// instance.
  ///
  /// This is the method-invocation form of a forwarded get: `proxy.call_method(heap, "inc", &[])`
  /// corresponds to `proxy.inc()`, and mutation `inc` performs on `this` lands on the instance,
  /// visible through subsequent proxy operations.
  pub fn call_method(
    &mut self,
    heap: &mut Heap,
    key: &PropertyKey,
    args: &[Value],
  ) -> Result<Value, ProxyError> {
    let instance = self.ensure_initialized(heap)?;
    let callee = heap.ordinary_get(instance, key, Value::Object(instance))?;
    heap.call(callee, Value::Object(instance), args)
  }
}

impl fmt::Debug for LazyProxy {
  // Reports slot state only; must not trigger initialization.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LazyProxy")
      .field("initialized", &self.instance.is_some())
      .finish_non_exhaustive()
  }
}
