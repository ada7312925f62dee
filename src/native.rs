use crate::error::ProxyError;
use crate::heap::Heap;
use crate::value::Value;

/// A native `[[Call]]` entrypoint implemented in Rust.
///
/// `this` carries the receiver the callable was invoked on. For a method reached through
/// [`LazyProxy::call_method`](crate::LazyProxy::call_method), the receiver is the underlying
/// instance — never the proxy — so mutation the method performs on `this` is visible through
/// subsequent proxy operations. The same convention applies to accessor getters and setters
/// invoked by `[[Get]]`/`[[Set]]`.
///
/// Native functions may allocate through the `&mut Heap` they are handed.
pub type NativeCallFn = fn(&mut Heap, this: Value, args: &[Value]) -> Result<Value, ProxyError>;
