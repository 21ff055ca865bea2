//! Catalog storage split into the in-memory collection and its JSON file
//! adapter.

mod catalog;
mod persistence;

pub use catalog::BookStore;
pub use persistence::{decode, encode, LoadOutcome};
