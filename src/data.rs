use alloc::vec::Vec;

use crate::itemmap::ItemMap;

#[cfg(feature = "serde_support")]
use crate::error::StructError;
#[cfg(feature = "serde_support")]
use alloc::string::ToString;
#[cfg(feature = "serde_support")]
use serde::{de::DeserializeOwned, Serialize};
#[cfg(feature = "serde_support")]
use serde_json::{json, Value};

/// Represents the value held by one property of a generated structure.
///
/// Only ```DArray``` is treated as a collection by ```StructArray```. A property
/// that holds a single ```DItem``` or ```DNull``` has no collection view until
/// something is appended to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Data<T> {
  /// A single value
  ///
  /// ```
  /// # use structarray::Data;
  /// #
  /// let d = Data::DItem("hello world".to_owned());
  /// ```
  DItem(T),
  /// A keyed collection of values
  ///
  /// ```
  /// # use structarray::{Data, ItemMap};
  /// #
  /// let d = Data::DArray(ItemMap::from(vec![1, 2, 3]));
  /// ```
  DArray(ItemMap<T>),
  /// Contains no value
  ///
  /// ```
  /// # use structarray::Data;
  /// #
  /// let d: Data<i64> = Data::DNull;
  /// ```
  DNull,
}

impl<T> Data<T> {
  /// Returns ```true``` if the value is of type ```DItem```.
  pub fn is_item(&self) -> bool {
    matches!(self, Data::DItem(_))
  }

  /// Returns ```true``` if the value is of type ```DArray```.
  pub fn is_array(&self) -> bool {
    matches!(self, Data::DArray(_))
  }

  /// Returns ```true``` if the value is of type ```DNull```.
  pub fn is_null(&self) -> bool {
    matches!(self, Data::DNull)
  }

  pub fn as_item(&self) -> Option<&T> {
    if let Data::DItem(t) = self { Some(t) } else { None }
  }

  pub fn as_array(&self) -> Option<&ItemMap<T>> {
    if let Data::DArray(a) = self { Some(a) } else { None }
  }

  pub fn into_array(self) -> Option<ItemMap<T>> {
    if let Data::DArray(a) = self { Some(a) } else { None }
  }

  /// Name of the variant, for log messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      Data::DItem(_) => "item",
      Data::DArray(_) => "array",
      Data::DNull => "null",
    }
  }
}

impl<T> From<ItemMap<T>> for Data<T> {
  fn from(map: ItemMap<T>) -> Self {
    Data::DArray(map)
  }
}

impl<T> From<Vec<T>> for Data<T> {
  fn from(items: Vec<T>) -> Self {
    Data::DArray(ItemMap::from(items))
  }
}

#[cfg(feature = "serde_support")]
impl<T: Serialize> Data<T> {
  /// Renders the value as JSON.
  ///
  /// A contiguous collection becomes a JSON array. A collection with gaps keeps
  /// its keys and becomes a JSON object keyed by the decimal index.
  pub fn to_json(&self) -> Result<Value, StructError> {
    match self {
      Data::DNull => Ok(json!(null)),
      Data::DItem(t) => Ok(serde_json::to_value(t)?),
      Data::DArray(map) => array_to_json(map),
    }
  }
}

#[cfg(feature = "serde_support")]
pub(crate) fn array_to_json<T: Serialize>(map: &ItemMap<T>) -> Result<Value, StructError> {
  if map.is_contiguous() {
    let mut json_vec = Vec::with_capacity(map.len());
    for value in map.values() {
      json_vec.push(serde_json::to_value(value)?);
    }
    return Ok(Value::Array(json_vec));
  }
  let mut json_map = serde_json::Map::new();
  for (key, value) in map.iter() {
    json_map.insert(key.to_string(), serde_json::to_value(value)?);
  }
  Ok(Value::Object(json_map))
}

#[cfg(feature = "serde_support")]
impl<T: DeserializeOwned> Data<T> {
  /// Reads a value from JSON. Arrays become ```DArray```, ```null``` becomes
  /// ```DNull``` and anything else is deserialized as a single ```DItem```.
  pub fn from_json(value: Value) -> Result<Self, StructError> {
    match value {
      Value::Null => Ok(Data::DNull),
      Value::Array(values) => {
        let mut map = ItemMap::new();
        for v in values {
          map.push(serde_json::from_value(v)?);
        }
        Ok(Data::DArray(map))
      }
      other => Ok(Data::DItem(serde_json::from_value(other)?)),
    }
  }
}

/// The default for ```Data``` is ```DNull```.
impl<T> Default for Data<T> {
  fn default() -> Data<T> {
    Data::DNull
  }
}
