use core::fmt;

/// A stable identifier for an allocation in the [`Heap`](crate::Heap).
///
/// This is an index into the heap's slot vector. The heap is an arena: slots are never freed
/// individually (everything is released when the heap is dropped), so a `HeapId` obtained from a
/// heap stays valid for that heap's entire lifetime. Using a `HeapId` with a *different* heap is
/// detected only insofar as the index is out of bounds or the slot holds a different kind of
/// allocation; both report [`ProxyError::InvalidHandle`](crate::ProxyError::InvalidHandle).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HeapId(pub(crate) u32);

impl HeapId {
  /// The slot index within the heap.
  #[inline]
  pub fn index(self) -> u32 {
    self.0
  }
}

impl fmt::Debug for HeapId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("HeapId").field(&self.0).finish()
  }
}

/// A heap-allocated JavaScript object (ordinary object or native function).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct ObjectId(pub(crate) HeapId);

impl ObjectId {
  /// The underlying [`HeapId`].
  #[inline]
  pub fn id(self) -> HeapId {
    self.0
  }
}

/// A heap-allocated JavaScript string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct StringId(pub(crate) HeapId);

impl StringId {
  /// The underlying [`HeapId`].
  #[inline]
  pub fn id(self) -> HeapId {
    self.0
  }
}

/// A heap-allocated JavaScript symbol.
///
/// Symbol equality is handle identity: two `SymbolId`s are the same symbol iff they are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct SymbolId(pub(crate) HeapId);

impl SymbolId {
  /// The underlying [`HeapId`].
  #[inline]
  pub fn id(self) -> HeapId {
    self.0
  }
}
