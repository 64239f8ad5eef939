//! This module defines the `PropertyStore` contract that `StructArray` reads and
//! writes through, and `StructBase`, a map-backed store with a fixed set of
//! declared properties.

#[cfg(not(feature = "no_std_support"))]
use std::collections::HashMap;

#[cfg(feature = "no_std_support")]
use hashbrown::HashMap;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::data::*;
use crate::error::StructError;

#[cfg(feature = "serde_support")]
use serde::{de::DeserializeOwned, Serialize};
#[cfg(feature = "serde_support")]
use serde_json::Value;

/// Generic by-name access to the properties of a generated structure.
///
/// A generated type implements this once and names the property that holds
/// its repeated element in `attribute_name`. `StructArray` never touches any
/// other property on its own.
pub trait PropertyStore<T> {
  /// Name of the property treated as a collection. Must not change over the
  /// lifetime of the store.
  fn attribute_name(&self) -> &str;

  fn get_property(&self, name: &str) -> Option<&Data<T>>;

  /// Replaces the value of `name`. On error the store is left unchanged.
  fn set_property(&mut self, name: &str, value: Data<T>) -> Result<(), StructError>;

  /// Returns `true` if the structure declares a property called `name`.
  fn has_property(&self, name: &str) -> bool {
    self.get_property(name).is_some()
  }
}

/// A property store backed by a `HashMap<String, Data<T>>`.
///
/// Properties are declared up front and start out as `DNull`. Writing to a
/// property that was never declared fails with `StructError::UnknownProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructBase<T> {
  attribute: String,
  properties: HashMap<String, Data<T>>,
}

impl<T> StructBase<T> {
  /// Creates a store whose designated collection property is `attribute`.
  /// `attribute` is always declared, whether or not it appears in `declared`.
  ///
  /// ```
  /// # use structarray::{PropertyStore, StructBase};
  /// let s: StructBase<String> = StructBase::new("item", &["name"]);
  /// assert_eq!(s.attribute_name(), "item");
  /// assert_eq!(s.keys(), vec!["item".to_string(), "name".to_string()]);
  /// ```
  pub fn new(attribute: &str, declared: &[&str]) -> Self {
    let mut properties = HashMap::new();
    properties.insert(attribute.to_string(), Data::DNull);
    for name in declared {
      properties.insert(name.to_string(), Data::DNull);
    }
    StructBase {
      attribute: attribute.to_string(),
      properties,
    }
  }

  /// Sets a declared property while building the store.
  pub fn with_property(mut self, name: &str, value: Data<T>) -> Result<Self, StructError> {
    self.put(name, value)?;
    Ok(self)
  }

  pub fn has(&self, name: &str) -> bool {
    self.properties.contains_key(name)
  }

  /// Declared property names, sorted.
  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.properties.keys().cloned().collect();
    keys.sort();
    keys
  }

  pub fn properties(&self) -> impl Iterator<Item = (&str, &Data<T>)> {
    self.properties.iter().map(|(k, v)| (k.as_str(), v))
  }

  fn put(&mut self, name: &str, value: Data<T>) -> Result<(), StructError> {
    match self.properties.get_mut(name) {
      Some(slot) => {
        *slot = value;
        Ok(())
      }
      None => Err(StructError::UnknownProperty(name.to_string())),
    }
  }
}

impl<T> PropertyStore<T> for StructBase<T> {
  fn attribute_name(&self) -> &str {
    &self.attribute
  }

  fn get_property(&self, name: &str) -> Option<&Data<T>> {
    self.properties.get(name)
  }

  fn set_property(&mut self, name: &str, value: Data<T>) -> Result<(), StructError> {
    self.put(name, value)
  }

  fn has_property(&self, name: &str) -> bool {
    self.has(name)
  }
}

#[cfg(feature = "serde_support")]
impl<T: Serialize> StructBase<T> {
  /// Renders every declared property into one JSON object.
  pub fn to_json(&self) -> Result<Value, StructError> {
    let mut map = serde_json::Map::new();
    for key in self.keys() {
      if let Some(value) = self.properties.get(&key) {
        map.insert(key, value.to_json()?);
      }
    }
    Ok(Value::Object(map))
  }
}

#[cfg(feature = "serde_support")]
impl<T: DeserializeOwned> StructBase<T> {
  /// Builds a store from a JSON object. Every key of the object becomes a
  /// declared property; `attribute` is declared even when absent from the object.
  pub fn from_json(attribute: &str, value: Value) -> Result<Self, StructError> {
    let json_obj = match value {
      Value::Object(map) => map,
      other => {
        return Err(StructError::Json(alloc::format!(
          "expected a JSON object, found {}", other
        )))
      }
    };

    let mut base = StructBase::new(attribute, &[]);
    for (key, val) in json_obj {
      base.properties.insert(key, Data::from_json(val)?);
    }
    Ok(base)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_declares_attribute() {
    let s: StructBase<i32> = StructBase::new("item", &["label", "item"]);
    assert_eq!(s.keys(), vec!["item".to_string(), "label".to_string()]);
    assert_eq!(s.get_property("item"), Some(&Data::DNull));
    assert!(s.has_property("label"));
    assert!(!s.has_property("missing"));
  }

  #[test]
  fn test_set_unknown_property_fails() {
    let mut s: StructBase<i32> = StructBase::new("item", &[]);
    let err = s.set_property("other", Data::DItem(1)).unwrap_err();
    assert_eq!(err, StructError::UnknownProperty("other".to_string()));
    assert!(!s.has("other"));
  }

  #[test]
  fn test_with_property() {
    let s = StructBase::new("item", &["label"])
      .with_property("label", Data::DItem(3))
      .unwrap();
    assert_eq!(s.get_property("label").and_then(|d| d.as_item()), Some(&3));
    assert!(StructBase::new("item", &[]).with_property("nope", Data::DItem(3)).is_err());
  }

  #[cfg(feature = "serde_support")]
  #[test]
  fn test_json_round_trip() {
    use serde_json::json;
    let s: StructBase<String> =
      StructBase::from_json("item", json!({"item": ["a", "b"], "label": "x"})).unwrap();
    assert_eq!(s.get_property("item"), Some(&Data::from(vec!["a".to_string(), "b".to_string()])));
    assert_eq!(s.to_json().unwrap(), json!({"item": ["a", "b"], "label": "x"}));

    let empty: StructBase<String> = StructBase::from_json("item", json!({})).unwrap();
    assert_eq!(empty.get_property("item"), Some(&Data::DNull));

    assert!(StructBase::<String>::from_json("item", json!([1])).is_err());
  }
}
