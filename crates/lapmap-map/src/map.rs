//! In-memory tile map: tilesets, layers, and tile source rectangles.

use image::RgbaImage;

use crate::error::MapLoadError;

/// Global tile id of an empty cell.
pub const EMPTY_TILE: u32 = 0;

/// Pixel rectangle of one tile inside its tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A tileset image cut into a grid of equally sized tiles.
///
/// Tiles are numbered left to right, top to bottom, starting at `first_gid`.
#[derive(Debug, Clone)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub columns: u32,
    pub tile_count: u32,
    /// Border around the whole tile grid, in pixels.
    pub margin: u32,
    /// Gap between adjacent tiles, in pixels.
    pub spacing: u32,
    pub image: RgbaImage,
}

impl Tileset {
    /// Whether `gid` belongs to this tileset.
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    /// Source rectangle of `gid` for tiles of `tile_width x tile_height`.
    pub fn tile_rect(&self, gid: u32, tile_width: u32, tile_height: u32) -> Option<TileRect> {
        if !self.contains(gid) || self.columns == 0 {
            return None;
        }
        let index = gid - self.first_gid;
        let offset = |cell: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(cell)?
                .checked_add(self.margin)
        };
        Some(TileRect {
            x: offset(index % self.columns, tile_width)?,
            y: offset(index / self.columns, tile_height)?,
            width: tile_width,
            height: tile_height,
        })
    }

    /// Image size needed to hold every tile of the grid, or `None` if it
    /// doesn't fit in `u32`.
    fn required_size(&self, tile_width: u32, tile_height: u32) -> Option<(u32, u32)> {
        if self.tile_count == 0 {
            return Some((0, 0));
        }
        let columns = self.columns.max(1);
        let rows = self.tile_count.div_ceil(columns);
        let span = |count: u32, size: u32| {
            count
                .checked_mul(size)?
                .checked_add((count - 1).checked_mul(self.spacing)?)?
                .checked_add(self.margin)
        };
        Some((
            span(columns.min(self.tile_count), tile_width)?,
            span(rows, tile_height)?,
        ))
    }
}

/// One grid of tile ids, rendered on top of the layers before it.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Row-major global tile ids, top row first.
    pub tiles: Vec<u32>,
    pub visible: bool,
    /// Layer opacity in 0.0..=1.0.
    pub opacity: f32,
}

impl TileLayer {
    /// A fully visible, opaque layer.
    pub fn new(name: impl Into<String>, width: u32, height: u32, tiles: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles,
            visible: true,
            opacity: 1.0,
        }
    }

    /// Non-empty cells as `(col, row, gid)`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &gid)| gid != EMPTY_TILE)
            .map(move |(i, &gid)| (i as u32 % width, i as u32 / width, gid))
    }
}

/// A validated tile map.
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_width: u32,
    tile_height: u32,
    tilesets: Vec<Tileset>,
    layers: Vec<TileLayer>,
}

impl TileMap {
    /// Build a map, checking layer sizes, tile ids and tileset images.
    pub fn new(
        tile_width: u32,
        tile_height: u32,
        tilesets: Vec<Tileset>,
        layers: Vec<TileLayer>,
    ) -> Result<Self, MapLoadError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(MapLoadError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        for tileset in &tilesets {
            let (required_width, required_height) = tileset
                .required_size(tile_width, tile_height)
                .ok_or_else(|| MapLoadError::TilesetGridOverflow {
                    tileset: tileset.name.clone(),
                })?;
            let (width, height) = tileset.image.dimensions();
            if required_width > width || required_height > height {
                return Err(MapLoadError::TilesetTooSmall {
                    tileset: tileset.name.clone(),
                    required_width,
                    required_height,
                    width,
                    height,
                });
            }
        }

        let map = Self {
            tile_width,
            tile_height,
            tilesets,
            layers,
        };

        for layer in &map.layers {
            if layer_pixel_size(layer, tile_width, tile_height).is_none() {
                return Err(MapLoadError::LayerTooLarge {
                    layer: layer.name.clone(),
                    width: layer.width,
                    height: layer.height,
                });
            }
            let expected = layer.width as usize * layer.height as usize;
            if layer.tiles.len() != expected {
                return Err(MapLoadError::LayerSize {
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.tiles.len(),
                });
            }
            if let Some((_, _, gid)) = layer.cells().find(|&(_, _, gid)| map.tileset_for(gid).is_none())
            {
                return Err(MapLoadError::UnknownTile {
                    layer: layer.name.clone(),
                    gid,
                });
            }
        }

        Ok(map)
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Output size in pixels: the first layer's grid times the tile size.
    ///
    /// Returns `None` when the map has no layer. Every layer's pixel size fits
    /// in `u32`, which [`TileMap::new`] checks.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        self.layers
            .first()
            .and_then(|layer| layer_pixel_size(layer, self.tile_width, self.tile_height))
    }

    /// The tileset providing `gid`, if any.
    pub fn tileset_for(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets.iter().find(|tileset| tileset.contains(gid))
    }

    /// Tileset index and source rectangle of `gid`.
    pub fn tile_source(&self, gid: u32) -> Option<(usize, TileRect)> {
        self.tilesets.iter().enumerate().find_map(|(i, tileset)| {
            tileset
                .tile_rect(gid, self.tile_width, self.tile_height)
                .map(|rect| (i, rect))
        })
    }
}

fn layer_pixel_size(layer: &TileLayer, tile_width: u32, tile_height: u32) -> Option<(u32, u32)> {
    Some((
        layer.width.checked_mul(tile_width)?,
        layer.height.checked_mul(tile_height)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(first_gid: u32, columns: u32, tile_count: u32, image: (u32, u32)) -> Tileset {
        Tileset {
            name: "ground".to_string(),
            first_gid,
            columns,
            tile_count,
            margin: 0,
            spacing: 0,
            image: RgbaImage::new(image.0, image.1),
        }
    }

    #[test]
    fn test_pixel_size_uses_first_layer() {
        let map = TileMap::new(
            10,
            10,
            vec![tileset(1, 2, 4, (20, 20))],
            vec![
                TileLayer::new("road", 2, 2, vec![1, 2, 3, 4]),
                TileLayer::new("decor", 1, 1, vec![0]),
            ],
        )
        .unwrap();
        assert_eq!(map.pixel_size(), Some((20, 20)));
    }

    #[test]
    fn test_pixel_size_without_layers_is_none() {
        let map = TileMap::new(16, 16, vec![], vec![]).unwrap();
        assert_eq!(map.pixel_size(), None);
    }

    #[test]
    fn test_tile_rect_honors_margin_and_spacing() {
        let tileset = Tileset {
            margin: 1,
            spacing: 2,
            ..tileset(5, 3, 6, (40, 30))
        };
        assert_eq!(
            tileset.tile_rect(5, 10, 10),
            Some(TileRect {
                x: 1,
                y: 1,
                width: 10,
                height: 10
            })
        );
        // gid 9 is index 4: column 1, row 1.
        assert_eq!(
            tileset.tile_rect(9, 10, 10),
            Some(TileRect {
                x: 13,
                y: 13,
                width: 10,
                height: 10
            })
        );
        assert_eq!(tileset.tile_rect(11, 10, 10), None);
        assert_eq!(tileset.tile_rect(4, 10, 10), None);
    }

    #[test]
    fn test_tile_source_picks_matching_tileset() {
        let map = TileMap::new(
            8,
            8,
            vec![tileset(1, 2, 4, (16, 16)), tileset(5, 1, 2, (8, 16))],
            vec![TileLayer::new("road", 1, 1, vec![6])],
        )
        .unwrap();
        let (index, rect) = map.tile_source(6).unwrap();
        assert_eq!(index, 1);
        assert_eq!((rect.x, rect.y), (0, 8));
        assert!(map.tile_source(7).is_none());
    }

    #[test]
    fn test_layer_size_mismatch_is_rejected() {
        let result = TileMap::new(
            10,
            10,
            vec![tileset(1, 2, 4, (20, 20))],
            vec![TileLayer::new("road", 2, 2, vec![1, 2, 3])],
        );
        assert!(matches!(
            result,
            Err(MapLoadError::LayerSize {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_tile_is_rejected() {
        let result = TileMap::new(
            10,
            10,
            vec![tileset(1, 2, 4, (20, 20))],
            vec![TileLayer::new("road", 1, 1, vec![9])],
        );
        assert!(matches!(result, Err(MapLoadError::UnknownTile { gid: 9, .. })));
    }

    #[test]
    fn test_tileset_image_too_small_is_rejected() {
        let result = TileMap::new(10, 10, vec![tileset(1, 2, 4, (20, 10))], vec![]);
        assert!(matches!(
            result,
            Err(MapLoadError::TilesetTooSmall {
                required_width: 20,
                required_height: 20,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_tile_size_is_rejected() {
        let result = TileMap::new(0, 10, vec![], vec![]);
        assert!(matches!(result, Err(MapLoadError::ZeroTileSize { .. })));
    }

    #[test]
    fn test_cells_skip_empty_tiles() {
        let layer = TileLayer::new("road", 3, 2, vec![0, 2, 0, 4, 0, 6]);
        let cells: Vec<_> = layer.cells().collect();
        assert_eq!(cells, vec![(1, 0, 2), (0, 1, 4), (2, 1, 6)]);
    }

    #[test]
    fn test_layer_wider_than_u32_pixels_is_rejected() {
        let result = TileMap::new(
            65536,
            1,
            vec![],
            vec![TileLayer::new("wide", 65537, 1, vec![0; 65537])],
        );
        assert!(matches!(
            result,
            Err(MapLoadError::LayerTooLarge {
                width: 65537,
                height: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_largest_representable_layer_is_accepted() {
        let map = TileMap::new(
            65536,
            1,
            vec![],
            vec![TileLayer::new("wide", 65535, 1, vec![0; 65535])],
        )
        .unwrap();
        assert_eq!(map.pixel_size(), Some((65535 * 65536, 1)));
    }

    #[test]
    fn test_tileset_grid_overflow_is_rejected() {
        let result = TileMap::new(16, 16, vec![tileset(1, 1, u32::MAX, (16, 16))], vec![]);
        assert!(matches!(
            result,
            Err(MapLoadError::TilesetGridOverflow { .. })
        ));
    }

    #[test]
    fn test_tile_rect_past_u32_is_none() {
        let tileset = Tileset {
            spacing: u32::MAX,
            ..tileset(1, 1, 2, (1, 1))
        };
        assert_eq!(tileset.tile_rect(2, 10, 10), None);
    }
}
