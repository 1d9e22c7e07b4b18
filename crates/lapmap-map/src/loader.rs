//! RON map files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MapLoadError;
use crate::map::{TileLayer, TileMap, Tileset};

/// On-disk map description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapFile {
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default)]
    pub tilesets: Vec<TilesetFile>,
    #[serde(default)]
    pub layers: Vec<LayerFile>,
}

/// On-disk tileset. `image` is relative to the map file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TilesetFile {
    pub name: String,
    pub first_gid: u32,
    pub image: PathBuf,
    pub columns: u32,
    pub tile_count: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
}

/// On-disk tile layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerFile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

/// Parse a map description without touching the filesystem.
pub fn parse_map(contents: &str) -> Result<MapFile, MapLoadError> {
    ron::from_str(contents).map_err(MapLoadError::Parse)
}

/// Load a map file and the tileset images it references.
pub fn load_map(path: &Path) -> Result<TileMap, MapLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| MapLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_map(&contents)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tilesets = Vec::with_capacity(file.tilesets.len());
    for tileset in file.tilesets {
        let image_path = base_dir.join(&tileset.image);
        let image = image::open(&image_path)
            .map_err(|source| MapLoadError::TilesetImage {
                path: image_path.clone(),
                source,
            })?
            .to_rgba8();
        log::debug!(
            "Loaded tileset '{}' from {} ({}x{})",
            tileset.name,
            image_path.display(),
            image.width(),
            image.height()
        );
        tilesets.push(Tileset {
            name: tileset.name,
            first_gid: tileset.first_gid,
            columns: tileset.columns,
            tile_count: tileset.tile_count,
            margin: tileset.margin,
            spacing: tileset.spacing,
            image,
        });
    }

    let layers = file
        .layers
        .into_iter()
        .map(|layer| TileLayer {
            name: layer.name,
            width: layer.width,
            height: layer.height,
            tiles: layer.tiles,
            visible: layer.visible,
            opacity: layer.opacity,
        })
        .collect();

    let map = TileMap::new(file.tile_width, file.tile_height, tilesets, layers)?;
    log::info!(
        "Loaded map {} ({} layers, {} tilesets)",
        path.display(),
        map.layers().len(),
        map.tilesets().len()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK_RON: &str = r#"
        // two by two track, one tileset
        (
            tile_width: 10,
            tile_height: 10,
            tilesets: [
                (name: "ground", first_gid: 1, image: "tiles.png", columns: 2, tile_count: 4),
            ],
            layers: [
                (name: "road", width: 2, height: 2, tiles: [1, 2, 3, 4]),
                (name: "shadows", width: 2, height: 2, tiles: [0, 0, 0, 1], visible: false),
            ],
        )
    "#;

    fn write_tileset(dir: &Path) {
        let image = image::RgbaImage::from_fn(20, 20, |x, y| {
            image::Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255])
        });
        image.save(dir.join("tiles.png")).unwrap();
    }

    #[test]
    fn test_parse_applies_layer_defaults() {
        let file = parse_map(TRACK_RON).unwrap();
        assert_eq!(file.tilesets[0].margin, 0);
        assert!(file.layers[0].visible);
        assert_eq!(file.layers[0].opacity, 1.0);
        assert!(!file.layers[1].visible);
    }

    #[test]
    fn test_load_map_resolves_tileset_relative_to_map() {
        let dir = tempfile::tempdir().unwrap();
        write_tileset(dir.path());
        let map_path = dir.path().join("track.ron");
        std::fs::write(&map_path, TRACK_RON).unwrap();

        let map = load_map(&map_path).unwrap();
        assert_eq!(map.pixel_size(), Some((20, 20)));
        assert_eq!(map.layers().len(), 2);
        assert_eq!(map.tilesets()[0].image.get_pixel(19, 0).0, [190, 0, 0, 255]);
    }

    #[test]
    fn test_missing_map_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_map(&dir.path().join("nope.ron"));
        assert!(matches!(result, Err(MapLoadError::Read { .. })));
    }

    #[test]
    fn test_missing_tileset_image_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("track.ron");
        std::fs::write(&map_path, TRACK_RON).unwrap();

        let result = load_map(&map_path);
        assert!(matches!(result, Err(MapLoadError::TilesetImage { .. })));
    }

    #[test]
    fn test_malformed_map_is_parse_error() {
        assert!(matches!(
            parse_map("(tile_width: 10"),
            Err(MapLoadError::Parse(_))
        ));
    }
}
