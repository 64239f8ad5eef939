// --- Conditional Imports for BTreeMap and Vec ---

#[cfg(feature = "no_std_support")]
use alloc::collections::btree_map::{self, BTreeMap};
#[cfg(feature = "no_std_support")]
use alloc::vec::Vec;

#[cfg(not(feature = "no_std_support"))]
use std::collections::btree_map::{self, BTreeMap};
#[cfg(not(feature = "no_std_support"))]
use std::vec::Vec;

use core::fmt::{self, Debug};
use core::ops::Index;

/// An ordered map of type `<usize, T>` that behaves like a keyed array.
///
/// Entries live in a `BTreeMap`, so a sparse key costs one entry however large
/// it is. Removing an element leaves a gap instead of shifting later elements
/// down, so keys are never renumbered. New elements pushed onto the map always
/// receive a key one past the highest key ever allocated, even if that tail key
/// has since been removed.
///
/// Iteration is in ascending key order.
#[derive(Clone)]
pub struct ItemMap<T> {
  entries: BTreeMap<usize, T>,
  /// Key for the next `push`. `None` once `usize::MAX` has been allocated.
  next_key: Option<usize>,
}

impl<T> ItemMap<T> {
  /// Creates a new, empty `ItemMap`.
  ///
  /// # Examples
  ///
  /// ```
  /// use structarray::ItemMap;
  /// let map: ItemMap<String> = ItemMap::new();
  /// assert_eq!(map.len(), 0);
  /// ```
  pub fn new() -> Self {
    ItemMap {
      entries: BTreeMap::new(),
      next_key: Some(0),
    }
  }

  /// Appends an element, returning the key assigned to it.
  ///
  /// # Panics
  ///
  /// Panics if key `usize::MAX` has already been allocated. Check
  /// [`next_key`](ItemMap::next_key) first when keys come from outside.
  ///
  /// # Examples
  ///
  /// ```
  /// use structarray::ItemMap;
  /// let mut map = ItemMap::new();
  /// assert_eq!(map.push("a"), 0);
  /// assert_eq!(map.push("b"), 1);
  /// map.remove(1);
  /// // the removed tail key is not handed out again
  /// assert_eq!(map.push("c"), 2);
  /// ```
  pub fn push(&mut self, element: T) -> usize {
    let key = match self.next_key {
      Some(key) => key,
      None => panic!("ItemMap: no key left to push, key {} is allocated", usize::MAX),
    };
    self.entries.insert(key, element);
    self.next_key = key.checked_add(1);
    key
  }

  /// Stores `element` under `key`, returning the previous value if there was one.
  ///
  /// Setting a key past the end moves the next push key beyond it. The keys in
  /// between stay absent.
  ///
  /// # Examples
  ///
  /// ```
  /// use structarray::ItemMap;
  /// let mut map = ItemMap::new();
  /// map.set(2, "c");
  /// assert_eq!(map.len(), 1);
  /// assert_eq!(map.get(0), None);
  /// assert_eq!(map.set(2, "z"), Some("c"));
  /// assert_eq!(map.push("d"), 3);
  /// ```
  pub fn set(&mut self, key: usize, element: T) -> Option<T> {
    if self.next_key.map_or(false, |next| key >= next) {
      self.next_key = key.checked_add(1);
    }
    self.entries.insert(key, element)
  }

  /// Removes the element stored under `key`, returning it if it existed.
  ///
  /// # Examples
  ///
  /// ```
  /// use structarray::ItemMap;
  /// let mut map = ItemMap::new();
  /// let key = map.push(100);
  /// assert_eq!(map.remove(key), Some(100));
  /// assert_eq!(map.remove(key), None);
  /// assert_eq!(map.remove(999), None);
  /// ```
  pub fn remove(&mut self, key: usize) -> Option<T> {
    self.entries.remove(&key)
  }

  /// Returns a reference to the element stored under `key`, or `None` if the key
  /// was never set or was removed.
  pub fn get(&self, key: usize) -> Option<&T> {
    self.entries.get(&key)
  }

  /// Returns a mutable reference to the element stored under `key`.
  pub fn get_mut(&mut self, key: usize) -> Option<&mut T> {
    self.entries.get_mut(&key)
  }

  /// Returns `true` if an element is stored under `key`.
  pub fn contains_key(&self, key: usize) -> bool {
    self.entries.contains_key(&key)
  }

  /// The number of present keys. This is not the highest key plus one once gaps exist.
  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The key the next [`push`](ItemMap::push) will use, or `None` when
  /// `usize::MAX` has already been allocated.
  #[inline]
  pub fn next_key(&self) -> Option<usize> {
    self.next_key
  }

  /// Returns `true` when the present keys are exactly `0..len()`.
  pub fn is_contiguous(&self) -> bool {
    self.entries.keys().next_back().map_or(true, |last| *last == self.entries.len() - 1)
  }

  /// Present keys in ascending order.
  pub fn keys(&self) -> Vec<usize> {
    self.entries.keys().copied().collect()
  }

  /// Iterates over `(key, &value)` pairs in ascending key order.
  ///
  /// # Examples
  ///
  /// ```
  /// use structarray::ItemMap;
  /// let mut map = ItemMap::new();
  /// map.push("a");
  /// map.push("b");
  /// map.push("c");
  /// map.remove(1);
  /// let items: Vec<_> = map.iter().collect();
  /// assert_eq!(items, vec![(0, &"a"), (2, &"c")]);
  /// ```
  pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
    self.entries.iter().map(|(key, value)| (*key, value))
  }

  /// Iterates over the present values in ascending key order.
  pub fn values(&self) -> impl Iterator<Item = &T> {
    self.entries.values()
  }

  /// Removes all elements and forgets every allocated key.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.next_key = Some(0);
  }
}

/// An iterator that consumes an `ItemMap` and yields `(key, value)` pairs in key order.
#[derive(Debug)]
pub struct ItemMapIntoIter<T> {
  inner: btree_map::IntoIter<usize, T>,
}

impl<T> Iterator for ItemMapIntoIter<T> {
  type Item = (usize, T);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl<T> IntoIterator for ItemMap<T> {
  type Item = (usize, T);
  type IntoIter = ItemMapIntoIter<T>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    ItemMapIntoIter {
      inner: self.entries.into_iter(),
    }
  }
}

/// Builds a contiguous map with keys `0..n`.
impl<T> FromIterator<T> for ItemMap<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut map = ItemMap::new();
    for element in iter {
      map.push(element);
    }
    map
  }
}

impl<T> From<Vec<T>> for ItemMap<T> {
  fn from(items: Vec<T>) -> Self {
    items.into_iter().collect()
  }
}

/// Implements immutable indexing (`map[key]`).
///
/// # Panics
///
/// Panics if nothing is stored under `key`. Use [`get`](ItemMap::get) for
/// non-panicking access.
impl<T> Index<usize> for ItemMap<T> {
  type Output = T;

  #[inline]
  fn index(&self, key: usize) -> &Self::Output {
    match (self.entries.get(&key), self.next_key) {
      (Some(value), _) => value,
      (None, Some(next)) if key >= next => {
        panic!("ItemMap: key {} out of bounds (next key is {})", key, next)
      }
      (None, _) => panic!("ItemMap: key {} is empty", key),
    }
  }
}

/// Two maps are equal when they hold the same values under the same keys.
/// Removed tail keys do not take part in the comparison.
impl<T: PartialEq> PartialEq for ItemMap<T> {
  fn eq(&self, other: &Self) -> bool {
    self.entries == other.entries
  }
}

impl<T: Eq> Eq for ItemMap<T> {}

impl<T: Debug> Debug for ItemMap<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<T> Default for ItemMap<T> {
  fn default() -> Self {
    Self::new()
  }
}
