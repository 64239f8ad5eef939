//! This module defines `StructArray`, which presents one designated property of a
//! generated structure as an ordered, indexable, iterable collection.
//!
//! The adapter keeps its own copy of the collection and writes the full
//! collection back to the property store on every append, set and remove, so
//! the two never disagree. Reading is lazy: the store is consulted once when the
//! adapter is created and afterwards only when `materialize` is called.

use alloc::string::ToString;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::data::*;
use crate::error::StructError;
use crate::itemmap::ItemMap;
use crate::structbase::PropertyStore;

#[cfg(feature = "serde_support")]
use serde::Serialize;
#[cfg(feature = "serde_support")]
use serde_json::Value;

/// Whether the designated property currently has a collection view.
#[derive(Debug, Clone, PartialEq)]
enum ArrayState<T> {
  /// No collection yet. `count()` reports `-1`.
  Uninitialized,
  /// A collection with no entries.
  Empty,
  /// A collection with at least one entry.
  Populated(ItemMap<T>),
}

impl<T> ArrayState<T> {
  fn from_map(map: ItemMap<T>) -> Self {
    if map.is_empty() { ArrayState::Empty } else { ArrayState::Populated(map) }
  }

  fn map(&self) -> Option<&ItemMap<T>> {
    if let ArrayState::Populated(map) = self { Some(map) } else { None }
  }
}

/// Array-style access to the designated property of a `PropertyStore`.
///
/// Iteration uses a single cursor owned by the adapter. Starting a new pass
/// (`rewind` or `items`) restarts it for everyone, and `append` moves it back
/// to 0. The cursor stops at the first missing key, so a pass over a
/// collection with gaps ends early.
///
/// A `StructArray` is not meant to be shared between threads. Callers that need
/// that must put it behind their own lock.
///
/// ```
/// use structarray::{StructArray, StructBase};
///
/// let mut list = StructArray::new(StructBase::new("item", &[]));
/// assert_eq!(list.count(), -1);
///
/// list.append("a")?.append("b")?.append("c")?;
/// list.remove(1)?;
/// assert_eq!(list.count(), 2);
/// assert_eq!(list.keys(), vec![0, 2]);
/// assert_eq!(list.get(2), Some(&"c"));
/// # Ok::<(), structarray::StructError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StructArray<T, S> {
  store: S,
  state: ArrayState<T>,
  offset: usize,
}

impl<T: Clone, S: PropertyStore<T>> StructArray<T, S> {
  /// Wraps `store` and adopts the designated property if it already holds a
  /// non-empty collection.
  pub fn new(store: S) -> Self {
    let mut array = StructArray {
      store,
      state: ArrayState::Uninitialized,
      offset: 0,
    };
    array.materialize();
    array
  }

  /// Pulls the designated property into the adapter if no collection view
  /// exists yet. Returns `true` if the adapter is live afterwards.
  ///
  /// Only a non-empty collection is adopted. Once live, calling this again does
  /// nothing, so an emptied collection is not replaced with the store's value.
  pub fn materialize(&mut self) -> bool {
    if self.is_live() {
      return true;
    }

    let attribute = self.store.attribute_name();
    if !self.store.has_property(attribute) {
      debug!("Property '{}' is not declared, no collection view", attribute);
      return false;
    }

    match self.store.get_property(attribute) {
      Some(Data::DArray(map)) if !map.is_empty() => {
        debug!("Adopted {} items from property '{}'", map.len(), attribute);
        self.state = ArrayState::Populated(map.clone());
        self.offset = 0;
        true
      }
      other => {
        debug!(
          "Property '{}' holds {}, no collection view",
          attribute,
          other.map_or("nothing", Data::type_name)
        );
        false
      }
    }
  }

  /// Appends `item` to the end of the collection.
  ///
  /// A designated property that does not hold a collection is replaced by one.
  /// The adapter becomes live and the cursor returns to 0. Fails with
  /// `KeyspaceExhausted` once key `usize::MAX` has been used.
  pub fn append(&mut self, item: T) -> Result<&mut Self, StructError> {
    let attribute = self.store.attribute_name();
    let mut current = match self.store.get_property(attribute) {
      Some(Data::DArray(map)) => map.clone(),
      Some(Data::DNull) | None => ItemMap::new(),
      Some(other) => {
        warn!("Replacing {} value of property '{}' with a collection", other.type_name(), attribute);
        ItemMap::new()
      }
    };
    if current.next_key().is_none() {
      return Err(StructError::KeyspaceExhausted(attribute.to_string()));
    }
    current.push(item);
    self.sync(current)?;
    self.offset = 0;
    Ok(self)
  }

  /// Stores `value` under `index`, creating the key if needed, and returns the
  /// value it replaced. This makes the adapter live.
  ///
  /// Without a populated view the write builds on whatever collection the store
  /// holds, so keys already allocated there are not handed out again.
  pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>, StructError> {
    let mut map = match &self.state {
      ArrayState::Populated(map) => map.clone(),
      _ => self.stored_array().cloned().unwrap_or_default(),
    };
    let old = map.set(index, value);
    self.sync(map)?;
    Ok(old)
  }

  /// Removes the entry under `index`. Later keys keep their numbers. Returns
  /// `Ok(None)` without touching the store if there is no such entry.
  pub fn remove(&mut self, index: usize) -> Result<Option<T>, StructError> {
    let mut map = match &self.state {
      ArrayState::Populated(map) if map.contains_key(index) => map.clone(),
      _ => return Ok(None),
    };
    let removed = map.remove(index);
    self.sync(map)?;
    Ok(removed)
  }

  /// Writes a property of the underlying store. Writing the designated
  /// property drops the current collection view and materializes it again.
  pub fn set_property(&mut self, name: &str, value: Data<T>) -> Result<(), StructError> {
    self.store.set_property(name, value)?;
    if name == self.store.attribute_name() {
      debug!("Property '{}' replaced directly, rebuilding collection view", name);
      self.state = ArrayState::Uninitialized;
      self.offset = 0;
      self.materialize();
    }
    Ok(())
  }

  /// Writes `map` to the store, then adopts it. Nothing changes if the write fails.
  fn sync(&mut self, map: ItemMap<T>) -> Result<(), StructError> {
    let attribute = self.store.attribute_name().to_string();
    self.store.set_property(&attribute, Data::DArray(map.clone()))?;
    self.state = ArrayState::from_map(map);
    Ok(())
  }
}

impl<T, S: PropertyStore<T>> StructArray<T, S> {
  /// Number of entries, or `-1` when there is no collection view at all.
  pub fn count(&self) -> isize {
    match &self.state {
      ArrayState::Uninitialized => -1,
      ArrayState::Empty => 0,
      ArrayState::Populated(map) => map.len() as isize,
    }
  }

  pub fn is_live(&self) -> bool {
    !matches!(self.state, ArrayState::Uninitialized)
  }

  /// `true` only for a live collection with no entries.
  pub fn is_empty(&self) -> bool {
    matches!(self.state, ArrayState::Empty)
  }

  pub fn get(&self, index: usize) -> Option<&T> {
    self.state.map().and_then(|map| map.get(index))
  }

  pub fn contains_key(&self, index: usize) -> bool {
    self.state.map().map_or(false, |map| map.contains_key(index))
  }

  pub fn first(&self) -> Option<&T> {
    self.get(0)
  }

  /// The entry under `count() - 1`. Once removals have left gaps this is not
  /// necessarily the entry with the highest key.
  pub fn last(&self) -> Option<&T> {
    usize::try_from(self.count() - 1).ok().and_then(|index| self.get(index))
  }

  /// Present keys in ascending order.
  pub fn keys(&self) -> Vec<usize> {
    self.state.map().map(ItemMap::keys).unwrap_or_default()
  }

  /// All `(key, value)` pairs in key order. Does not move the cursor.
  pub fn entries(&self) -> impl Iterator<Item = (usize, &T)> {
    self.state.map().into_iter().flat_map(|map| map.iter())
  }

  // --- Cursor ---

  /// The entry under the cursor.
  pub fn current(&self) -> Option<&T> {
    self.get(self.offset)
  }

  pub fn advance(&mut self) {
    self.offset += 1;
  }

  pub fn rewind(&mut self) {
    self.offset = 0;
  }

  /// `true` if an entry exists under the cursor.
  pub fn valid(&self) -> bool {
    self.contains_key(self.offset)
  }

  /// The raw cursor position. It matches a collection key only while no
  /// removal has left a gap before it.
  pub fn key(&self) -> usize {
    self.offset
  }

  /// Rewinds the cursor and returns an iterator that walks it forward.
  ///
  /// The iterator borrows the adapter mutably, so no other pass can run while
  /// it is alive. When it finishes, the cursor rests on the first missing key.
  pub fn items(&mut self) -> Items<'_, T> {
    let StructArray { state, offset, .. } = self;
    *offset = 0;
    Items { map: state.map(), offset }
  }

  // --- Store access ---

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  pub fn attribute_name(&self) -> &str {
    self.store.attribute_name()
  }

  pub fn property(&self, name: &str) -> Option<&Data<T>> {
    self.store.get_property(name)
  }

  fn stored_array(&self) -> Option<&ItemMap<T>> {
    self.store.get_property(self.store.attribute_name()).and_then(Data::as_array)
  }
}

#[cfg(feature = "serde_support")]
impl<T: Serialize, S: PropertyStore<T>> StructArray<T, S> {
  /// Renders the collection view as JSON, `null` when there is none.
  pub fn to_json(&self) -> Result<Value, StructError> {
    match &self.state {
      ArrayState::Uninitialized => Ok(Value::Null),
      ArrayState::Empty => Ok(Value::Array(Vec::new())),
      ArrayState::Populated(map) => array_to_json(map),
    }
  }
}

/// Cursor-driven iterator returned by [`StructArray::items`].
#[derive(Debug)]
pub struct Items<'a, T> {
  map: Option<&'a ItemMap<T>>,
  offset: &'a mut usize,
}

impl<'a, T> Iterator for Items<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<Self::Item> {
    let value = self.map?.get(*self.offset)?;
    *self.offset += 1;
    Some(value)
  }
}

impl<'a, T, S: PropertyStore<T>> IntoIterator for &'a mut StructArray<T, S> {
  type Item = &'a T;
  type IntoIter = Items<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::structbase::StructBase;

  fn empty_list() -> StructArray<i32, StructBase<i32>> {
    StructArray::new(StructBase::new("item", &[]))
  }

  #[test]
  fn test_state_transitions() {
    let mut list = empty_list();
    assert_eq!(list.state, ArrayState::Uninitialized);

    list.append(1).unwrap();
    assert_eq!(list.state, ArrayState::Populated(ItemMap::from(vec![1])));

    list.remove(0).unwrap();
    assert_eq!(list.state, ArrayState::Empty);
    assert!(list.is_live());
    assert!(list.is_empty());
  }

  #[test]
  fn test_set_from_empty_keeps_next_key() {
    let mut list = empty_list();
    list.append(1).unwrap().append(2).unwrap();
    list.remove(1).unwrap();
    list.remove(0).unwrap();
    assert_eq!(list.count(), 0);

    list.set(0, 9).unwrap();
    list.append(3).unwrap();
    assert_eq!(list.keys(), vec![0, 2]);
  }

  #[test]
  fn test_set_from_uninitialized_builds_on_stored_collection() {
    let mut map = ItemMap::from(vec![1, 2]);
    map.remove(0);
    map.remove(1);
    let store = StructBase::new("item", &[]).with_property("item", Data::from(map)).unwrap();
    let mut list = StructArray::new(store);
    assert_eq!(list.state, ArrayState::Uninitialized);

    list.set(0, 9).unwrap();
    list.append(3).unwrap();
    assert_eq!(list.keys(), vec![0, 2]);
  }

  #[test]
  fn test_append_after_max_key_fails() {
    let mut list = empty_list();
    list.set(usize::MAX, 1).unwrap();

    let err = list.append(2).unwrap_err();
    assert_eq!(err, StructError::KeyspaceExhausted("item".to_string()));
    assert_eq!(list.state, ArrayState::Populated(list.stored_array().cloned().unwrap()));
    assert_eq!(list.keys(), vec![usize::MAX]);
  }

  #[test]
  fn test_items_leaves_cursor_on_gap() {
    let mut list = empty_list();
    list.append(10).unwrap().append(20).unwrap().append(30).unwrap();
    list.remove(1).unwrap();

    let seen: Vec<i32> = list.items().copied().collect();
    assert_eq!(seen, vec![10]);
    assert_eq!(list.key(), 1);
    assert!(!list.valid());
  }
}
