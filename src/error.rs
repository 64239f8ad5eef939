use alloc::string::String;
#[cfg(feature = "serde_support")]
use alloc::string::ToString;

/// Errors raised when writing to a property store.
///
/// Reads never fail: a missing key or a store without a collection is reported
/// as `None` (or `-1` from `StructArray::count`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructError {
  /// The store does not declare a property with this name.
  #[error("Unknown property: '{0}'")]
  UnknownProperty(String),
  /// The collection in this property already holds key `usize::MAX`, so
  /// `append` has no key left to assign.
  #[error("No key left to append to property '{0}'")]
  KeyspaceExhausted(String),
  /// A value could not be converted to or from JSON.
  #[cfg(feature = "serde_support")]
  #[error("JSON conversion failed: {0}")]
  Json(String),
}

#[cfg(feature = "serde_support")]
impl From<serde_json::Error> for StructError {
  fn from(e: serde_json::Error) -> Self {
    StructError::Json(e.to_string())
  }
}
