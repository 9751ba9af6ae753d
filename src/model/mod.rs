//! Plain data carried between the source, the engine and the store.

pub mod line_item;

pub use line_item::*;
