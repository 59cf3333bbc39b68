//! Playlist model: ordered tracks plus the current selection.
//!
//! The `Playlist` lives in `playlist::model` and owns every `Track`; the
//! controller mutates it through `push`/`remove` and the selection setters.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
