//! Tile quad batching: one draw per (layer, tileset) pair.
//!
//! Tiles of one layer never overlap, so grouping them by tileset keeps the
//! layer's result unchanged while binding each tileset texture once. Batches are
//! emitted in layer order so later layers draw over earlier ones.

use lapmap_map::{TileLayer, TileMap};

use crate::buffer::TileVertex;

/// Quads from a single layer that sample the same tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBatch {
    pub layer: usize,
    pub tileset: usize,
    pub vertices: Vec<TileVertex>,
    pub indices: Vec<u32>,
}

impl TileBatch {
    fn new(layer: usize, tileset: usize) -> Self {
        Self {
            layer,
            tileset,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of tiles in the batch.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Append an axis-aligned quad. `pos` and `uv` are (min, max) corners.
    fn push_quad(&mut self, pos: ([f32; 2], [f32; 2]), uv: ([f32; 2], [f32; 2]), opacity: f32) {
        let base = self.vertices.len() as u32;
        let (p0, p1) = pos;
        let (t0, t1) = uv;
        let corners = [
            ([p0[0], p0[1]], [t0[0], t0[1]]),
            ([p1[0], p0[1]], [t1[0], t0[1]]),
            ([p1[0], p1[1]], [t1[0], t1[1]]),
            ([p0[0], p1[1]], [t0[0], t1[1]]),
        ];
        for (position, uv) in corners {
            self.vertices.push(TileVertex {
                position,
                uv,
                opacity,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Whether `layer` contributes any pixels.
pub fn is_drawn(layer: &TileLayer) -> bool {
    layer.visible && layer.opacity > 0.0
}

/// Build the draw batches for every visible layer of `map`.
///
/// Hidden layers, fully transparent layers and empty cells produce no quads.
/// Empty batches are omitted.
pub fn build_tile_batches(map: &TileMap) -> Vec<TileBatch> {
    let tile_width = map.tile_width() as f32;
    let tile_height = map.tile_height() as f32;
    let mut batches = Vec::new();

    for (layer_index, layer) in map.layers().iter().enumerate() {
        if !is_drawn(layer) {
            continue;
        }
        let opacity = layer.opacity.min(1.0);
        let mut per_tileset: Vec<TileBatch> = (0..map.tilesets().len())
            .map(|tileset| TileBatch::new(layer_index, tileset))
            .collect();

        for (col, row, gid) in layer.cells() {
            let Some((tileset_index, rect)) = map.tile_source(gid) else {
                continue;
            };
            let (image_width, image_height) = map.tilesets()[tileset_index].image.dimensions();
            let x = col as f32 * tile_width;
            let y = row as f32 * tile_height;
            let u0 = rect.x as f32 / image_width as f32;
            let v0 = rect.y as f32 / image_height as f32;
            let u1 = (rect.x + rect.width) as f32 / image_width as f32;
            let v1 = (rect.y + rect.height) as f32 / image_height as f32;
            per_tileset[tileset_index].push_quad(
                ([x, y], [x + tile_width, y + tile_height]),
                ([u0, v0], [u1, v1]),
                opacity,
            );
        }

        batches.extend(per_tileset.into_iter().filter(|b| !b.indices.is_empty()));
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use lapmap_map::Tileset;

    fn tileset(name: &str, first_gid: u32, tile_count: u32) -> Tileset {
        Tileset {
            name: name.to_string(),
            first_gid,
            columns: 2,
            tile_count,
            margin: 0,
            spacing: 0,
            image: RgbaImage::new(10, 10),
        }
    }

    fn map(layers: Vec<TileLayer>) -> TileMap {
        TileMap::new(
            5,
            5,
            vec![tileset("a", 1, 4), tileset("b", 5, 4)],
            layers,
        )
        .unwrap()
    }

    #[test]
    fn test_batches_follow_layer_then_tileset_order() {
        let ground = TileLayer::new("ground", 2, 2, vec![5, 1, 0, 2]);
        let decor = TileLayer::new("decor", 2, 2, vec![0, 0, 6, 0]);

        let batches = build_tile_batches(&map(vec![ground, decor]));

        let keys: Vec<(usize, usize, usize)> = batches
            .iter()
            .map(|b| (b.layer, b.tileset, b.quad_count()))
            .collect();
        assert_eq!(keys, vec![(0, 0, 2), (0, 1, 1), (1, 1, 1)]);
    }

    #[test]
    fn test_quad_positions_and_uvs() {
        let ground = TileLayer::new("ground", 2, 2, vec![0, 0, 0, 4]);

        let batches = build_tile_batches(&map(vec![ground]));

        let batch = &batches[0];
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3]);
        // Cell (1, 1) is the bottom-right tile; gid 4 is tileset cell (1, 1).
        assert_eq!(batch.vertices[0].position, [5.0, 5.0]);
        assert_eq!(batch.vertices[2].position, [10.0, 10.0]);
        assert_eq!(batch.vertices[0].uv, [0.5, 0.5]);
        assert_eq!(batch.vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_hidden_and_transparent_layers_are_skipped() {
        let mut hidden = TileLayer::new("hidden", 2, 2, vec![1; 4]);
        hidden.visible = false;
        let mut clear = TileLayer::new("clear", 2, 2, vec![1; 4]);
        clear.opacity = 0.0;
        let mut faded = TileLayer::new("faded", 2, 2, vec![1, 0, 0, 0]);
        faded.opacity = 0.5;

        let batches = build_tile_batches(&map(vec![hidden, clear, faded]));

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].layer, 2);
        assert!(batches[0].vertices.iter().all(|v| v.opacity == 0.5));
    }
}
