//! Service layer for the item resource.
//! - `item::store` defines the storage contract and its two backends.
//! - `item::service` applies the resource semantics on top of a store.
//! - Absence (unknown id, no search match) is a value, never an error.

pub mod errors;
pub mod item;
