use crate::value::Value;

/// Errors produced by the heap and by forwarded proxy operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProxyError {
  /// A handle was used with a heap it does not belong to (or is otherwise malformed).
  #[error("invalid handle")]
  InvalidHandle,

  /// A property table or heap slot could not be allocated.
  #[error("out of memory")]
  OutOfMemory,

  /// An attempted prototype mutation would introduce a cycle in the `[[Prototype]]` chain.
  #[error("prototype cycle")]
  PrototypeCycle,

  /// A prototype chain traversal exceeded a hard upper bound.
  #[error("prototype chain too deep")]
  PrototypeChainTooDeep,

  /// The provided property descriptor patch is invalid.
  #[error("invalid property descriptor patch: cannot mix data and accessor fields")]
  InvalidPropertyDescriptorPatch,

  #[error("type error: {0}")]
  TypeError(&'static str),

  /// Attempted to call a non-callable value.
  #[error("value is not callable")]
  NotCallable,

  /// A failure value raised by a factory, getter or setter. Propagated unchanged.
  #[error("uncaught exception")]
  Throw(Value),
}
