//! Cancellation handles.
//!
//! A [`Disposable`] owns one teardown action; a [`CompoundDisposable`] owns a
//! dynamic set of children and cascades its disposal to them. Producers hand
//! their cleanup back to the runtime as a [`Teardown`].

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Formatter},
  rc::Rc,
};

mod compound;
mod dynamic;

pub use compound::{CompoundDisposable, WeakCompoundDisposable};
pub(crate) use dynamic::KeyedSlots;

/// A cancellation token wrapping an optional teardown action.
///
/// Clones share the same token. `dispose()` runs the action at most once no
/// matter how many clones call it, including reentrant calls made from inside
/// the action itself.
#[derive(Clone, Default)]
pub struct Disposable(Rc<DisposableInner>);

#[derive(Default)]
struct DisposableInner {
  disposed: Cell<bool>,
  action: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Disposable {
  pub fn new(action: impl FnOnce() + 'static) -> Self {
    Disposable(Rc::new(DisposableInner {
      disposed: Cell::new(false),
      action: RefCell::new(Some(Box::new(action))),
    }))
  }

  /// A token with no teardown action.
  pub fn empty() -> Self { Self::default() }

  pub fn dispose(&self) {
    if self.0.disposed.replace(true) {
      return;
    }
    let action = self.0.action.borrow_mut().take();
    if let Some(action) = action {
      action();
    }
  }

  /// Marks the token disposed and drops its action without running it.
  pub(crate) fn close(&self) {
    if !self.0.disposed.replace(true) {
      let action = self.0.action.borrow_mut().take();
      drop(action);
    }
  }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.0.disposed.get() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl Debug for Disposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Disposable")
      .field("disposed", &self.is_disposed())
      .finish()
  }
}

/// Cleanup returned by a producer, or stored as a child of a
/// [`CompoundDisposable`].
#[derive(Clone, Debug, Default)]
pub enum Teardown {
  /// Nothing to clean up.
  #[default]
  Empty,
  Action(Disposable),
  Compound(CompoundDisposable),
}

impl Teardown {
  pub fn dispose(&self) {
    match self {
      Teardown::Empty => {}
      Teardown::Action(d) => d.dispose(),
      Teardown::Compound(c) => c.dispose(),
    }
  }

  /// An empty teardown counts as already disposed: there is nothing left to
  /// release.
  pub fn is_disposed(&self) -> bool {
    match self {
      Teardown::Empty => true,
      Teardown::Action(d) => d.is_disposed(),
      Teardown::Compound(c) => c.is_disposed(),
    }
  }

  pub(crate) fn same_as(&self, other: &Teardown) -> bool {
    match (self, other) {
      (Teardown::Action(a), Teardown::Action(b)) => a.ptr_eq(b),
      (Teardown::Compound(a), Teardown::Compound(b)) => a.ptr_eq(b),
      _ => false,
    }
  }
}

impl From<()> for Teardown {
  #[inline]
  fn from(_: ()) -> Self { Teardown::Empty }
}

impl From<Disposable> for Teardown {
  #[inline]
  fn from(d: Disposable) -> Self { Teardown::Action(d) }
}

impl From<CompoundDisposable> for Teardown {
  #[inline]
  fn from(c: CompoundDisposable) -> Self { Teardown::Compound(c) }
}

impl<T: Into<Teardown>> From<Option<T>> for Teardown {
  fn from(t: Option<T>) -> Self { t.map_or(Teardown::Empty, Into::into) }
}
