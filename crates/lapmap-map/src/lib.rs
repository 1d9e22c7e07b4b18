//! Tile map model and loader.
//!
//! A [`TileMap`] is a stack of [`TileLayer`]s over a shared tile size, with the
//! pixel content of each tile coming from a [`Tileset`] image. Maps are described
//! in RON and loaded with [`load_map`]; tileset images are decoded with `image`.

mod error;
mod loader;
mod map;

pub use error::MapLoadError;
pub use loader::{LayerFile, MapFile, TilesetFile, load_map, parse_map};
pub use map::{EMPTY_TILE, TileLayer, TileMap, TileRect, Tileset};
