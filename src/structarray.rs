//! This crate provides array behavior for generated data structures.
//!
//! Code generated from an interface description (a WSDL `ArrayOf...` type, for
//! example) usually stores its repeated element in one named property. That
//! property may hold nothing, a single value, or a list. `StructArray` wraps the
//! structure and lets callers append, index, remove, count and iterate that one
//! property as a keyed collection, writing every change straight back to the
//! structure.
//!
//! The structure itself is reached through the `PropertyStore` trait.
//! `StructBase` is a ready-made store for callers without generated code.
//!
//! Features:
//! - `serde_support`: JSON conversion through `serde_json`.
//! - `no_std_support`: build against `alloc` only, using `hashbrown` maps.
//!
//! ```
//! use structarray::{Data, PropertyStore, StructArray, StructBase};
//!
//! let store = StructBase::new("item", &["label"])
//!   .with_property("item", Data::from(vec![1, 2, 3]))?;
//! let mut list = StructArray::new(store);
//!
//! assert_eq!(list.count(), 3);
//! list.set(1, 20)?;
//! assert_eq!(list.items().copied().collect::<Vec<_>>(), vec![1, 20, 3]);
//! assert_eq!(list.store().get_property("item"), Some(&Data::from(vec![1, 20, 3])));
//! # Ok::<(), structarray::StructError>(())
//! ```

#![cfg_attr(all(feature = "no_std_support", not(test)), no_std)]

extern crate alloc;

pub mod itemmap;
pub mod data;
pub mod error;
pub mod structbase;
pub mod arraybase;

#[cfg(test)]
mod structarray_tests;

pub use crate::arraybase::{Items, StructArray};
pub use crate::data::Data;
pub use crate::error::StructError;
pub use crate::itemmap::ItemMap;
pub use crate::structbase::{PropertyStore, StructBase};
