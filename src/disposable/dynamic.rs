use smallvec::SmallVec;

/// Entries keyed by a monotonically increasing id, kept in insertion order.
///
/// Ids are never reused, so a stale id held by a late removal hook can only
/// miss. Most owners hold one or two entries, which stay inline.
pub(crate) struct KeyedSlots<U> {
  next_id: usize,
  slots: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for KeyedSlots<U> {
  fn default() -> Self { Self { next_id: 0, slots: SmallVec::new() } }
}

impl<U> KeyedSlots<U> {
  pub fn add(&mut self, entry: U) -> usize {
    let id = self.reserve_id();
    self.insert(id, entry);
    id
  }

  /// Hands out an id now for an entry inserted later.
  pub fn reserve_id(&mut self) -> usize {
    self.next_id += 1;
    self.next_id - 1
  }

  pub fn insert(&mut self, id: usize, entry: U) { self.slots.push((id, entry)); }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    let at = self.slots.iter().position(|(slot, _)| *slot == id)?;
    Some(self.slots.remove(at).1)
  }

  #[inline]
  pub fn len(&self) -> usize { self.slots.len() }

  pub fn drain(&mut self) -> Vec<U> { self.slots.drain(..).map(|(_, entry)| entry).collect() }
}

impl<U: Clone> KeyedSlots<U> {
  /// Copies the entries out so a broadcast is unaffected by callbacks that
  /// add or remove entries.
  pub fn snapshot(&self) -> Vec<U> { self.slots.iter().map(|(_, entry)| entry.clone()).collect() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxsignal_macro::test]
  fn removed_ids_are_not_reused() {
    let mut slots = KeyedSlots::default();
    let a = slots.add('a');
    assert_eq!(slots.remove(a), Some('a'));
    let b = slots.add('b');
    assert_ne!(a, b);
    assert_eq!(slots.remove(a), None);
    assert_eq!(slots.snapshot(), vec!['b']);
  }

  #[rxsignal_macro::test]
  fn reserved_id_is_usable_later() {
    let mut slots = KeyedSlots::default();
    let early = slots.reserve_id();
    slots.add("first");
    assert_eq!(slots.len(), 1);
    slots.insert(early, "second");
    assert_eq!(slots.remove(early), Some("second"));
    assert_eq!(slots.drain(), vec!["first"]);
    assert_eq!(slots.len(), 0);
  }
}
