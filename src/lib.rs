#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A HashMap implementation using linear probing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

/// The open-addressing engine: slot array, linear probing, resizing and
/// tombstone-free removal.
pub mod hash_table;

/// Snapshot views over a map's entries, with a cursor that removes through to
/// the map.
pub mod entry_view;

/// Error types returned by the map, its cursor and its resize policy.
pub mod error;

pub use entry_view::EntryView;
pub use error::CursorError;
pub use error::InsertError;
pub use error::PolicyError;
pub use hash_map::HashMap;
pub use hash_map::Put;
pub use hash_table::HashTable;
pub use hash_table::ResizePolicy;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder for the default hasher builder when neither `foldhash`
        /// nor `std` is enabled. It cannot be constructed, so an explicit
        /// hasher must be supplied.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
