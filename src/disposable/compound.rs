use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  mem,
  rc::{Rc, Weak},
};

use smallvec::SmallVec;

use super::{Disposable, Teardown};

/// A reentrancy-safe composite of disposables.
///
/// Disposing the compound disposes a snapshot of its current children
/// exactly once. Children added while that cascade is running are disposed
/// after it finishes; children added after the compound is disposed are
/// disposed on the spot, so a resource never outlives its owner.
#[derive(Clone, Default)]
pub struct CompoundDisposable(Rc<RefCell<Inner>>);

/// Non-owning handle to a [`CompoundDisposable`].
#[derive(Clone, Default)]
pub struct WeakCompoundDisposable(Weak<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
  disposed: bool,
  disposing: bool,
  children: SmallVec<[Teardown; 2]>,
  pending: Vec<Teardown>,
}

impl CompoundDisposable {
  pub fn new() -> Self { Self::default() }

  /// Takes ownership of `teardown`.
  pub fn add(&self, teardown: impl Into<Teardown>) {
    let teardown = teardown.into();
    if teardown.is_disposed() {
      return;
    }
    if let Teardown::Compound(c) = &teardown {
      if c.ptr_eq(self) {
        return;
      }
    }
    let mut inner = self.0.borrow_mut();
    if inner.disposed {
      drop(inner);
      teardown.dispose();
    } else if inner.disposing {
      inner.pending.push(teardown);
    } else {
      inner.children.retain(|c| !c.is_disposed());
      inner.children.push(teardown);
    }
  }

  /// Gives up ownership of `teardown` without disposing it.
  ///
  /// Does nothing while the compound is disposing or disposed.
  pub fn remove(&self, teardown: &Teardown) {
    let mut inner = self.0.borrow_mut();
    if inner.disposed || inner.disposing {
      return;
    }
    inner.children.retain(|c| !c.same_as(teardown));
  }

  /// Owns `scope` until it is disposed, either through this compound or on
  /// its own; in the latter case it is released from this compound.
  pub fn adopt(&self, scope: &CompoundDisposable) {
    if scope.is_disposed() || scope.ptr_eq(self) {
      return;
    }
    self.add(scope.clone());
    let owner = self.downgrade();
    let weak_scope = scope.downgrade();
    scope.add(Disposable::new(move || {
      if let (Some(owner), Some(scope)) = (owner.upgrade(), weak_scope.upgrade()) {
        owner.remove(&scope.into());
      }
    }));
  }

  pub fn dispose(&self) {
    let children = {
      let mut inner = self.0.borrow_mut();
      if inner.disposed || inner.disposing {
        return;
      }
      inner.disposing = true;
      mem::take(&mut inner.children)
    };
    for child in children.iter() {
      child.dispose();
    }
    let pending = {
      let mut inner = self.0.borrow_mut();
      inner.disposed = true;
      inner.disposing = false;
      mem::take(&mut inner.pending)
    };
    for teardown in pending {
      teardown.dispose();
    }
  }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.0.borrow().disposed }

  /// Number of live children currently owned.
  pub fn len(&self) -> usize {
    self
      .0
      .borrow()
      .children
      .iter()
      .filter(|c| !c.is_disposed())
      .count()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  pub fn downgrade(&self) -> WeakCompoundDisposable { WeakCompoundDisposable(Rc::downgrade(&self.0)) }
}

impl WeakCompoundDisposable {
  pub fn upgrade(&self) -> Option<CompoundDisposable> { self.0.upgrade().map(CompoundDisposable) }
}

impl Debug for CompoundDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.0.try_borrow() {
      Ok(inner) => f
        .debug_struct("CompoundDisposable")
        .field("disposed", &inner.disposed)
        .field("disposing", &inner.disposing)
        .field("children", &inner.children.len())
        .finish(),
      Err(_) => f.write_str("CompoundDisposable { <borrowed> }"),
    }
  }
}
