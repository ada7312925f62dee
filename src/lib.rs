//! Lazily-initialized JavaScript object proxy.
//!
//! This crate provides [`LazyProxy`]: a handle that defers construction of an underlying
//! JavaScript-style object until the first operation performed on it, then forwards every
//! subsequent operation to that same object for the rest of its lifetime. Callers can hold a
//! reference to "the object" before it is cheap or safe to build it, without null-checking or
//! calling an explicit initializer at every use site.
//!
//! Rust has no ambient object/reflection model to intercept, so the crate also provides the
//! substrate the proxy forwards to:
//! - An arena-style [`Heap`] owning strings, symbols, objects and native functions, addressed by
//!   `Copy` handles ([`ObjectId`], [`StringId`], [`SymbolId`])
//! - ECMAScript-shaped values ([`Value`]) and property descriptors ([`PropertyDescriptor`])
//! - The ordinary-object internal methods (`[[Get]]`, `[[Set]]`, `[[Delete]]`, `[[HasProperty]]`,
//!   `[[OwnPropertyKeys]]`, `[[GetOwnProperty]]`, `[[DefineOwnProperty]]`,
//!   `[[GetPrototypeOf]]`/`[[SetPrototypeOf]]`, `[[IsExtensible]]`/`[[PreventExtensions]]`),
//!   implemented on [`Heap`]
//!
//! # At-most-once initialization
//!
//! The factory runs at most once *successfully* per proxy. A factory failure propagates to the
//! caller unchanged and leaves the slot empty, so the next operation retries. See [`LazyProxy`].
//!
//! # Receiver binding
//!
//! Methods and accessors reached through a proxy run with `this` bound to the underlying
//! instance, never the proxy, so mutations they perform are visible through later proxy
//! operations.

mod error;
mod handle;
mod heap;
mod native;
mod object_ops;
mod property;
mod proxy;
mod string;
mod symbol;
mod value;

pub use crate::error::ProxyError;
pub use crate::handle::HeapId;
pub use crate::handle::ObjectId;
pub use crate::handle::StringId;
pub use crate::handle::SymbolId;
pub use crate::heap::Heap;
pub use crate::heap::MAX_PROTOTYPE_CHAIN;
pub use crate::native::NativeCallFn;
pub use crate::property::PropertyDescriptor;
pub use crate::property::PropertyDescriptorPatch;
pub use crate::property::PropertyKey;
pub use crate::property::PropertyKind;
pub use crate::proxy::InstanceFactory;
pub use crate::proxy::LazyProxy;
pub use crate::string::JsString;
pub use crate::symbol::JsSymbol;
pub use crate::value::Value;
