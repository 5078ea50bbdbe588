//! Tile-grid stage: collision queries and spawn data
//!
//! A stage is an immutable grid of tile ids built once per stage load, either
//! from a Tiled JSON export or from any [`TileSource`]. Collision queries take
//! world-space points; everything outside the map counts as solid, so the map
//! edge acts as a wall without any special casing in the movement code.

use glam::DVec2;
use serde::Deserialize;
use thiserror::Error;

use crate::tile_coord;

/// Errors that abort stage construction.
///
/// A stage that fails to build is unusable; callers should treat these as
/// fatal for the stage load rather than falling back to an empty grid.
#[derive(Debug, Error)]
pub enum StageError {
    /// Tile map JSON could not be parsed
    #[error("failed to parse tile map JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Tile size must be a positive pixel count
    #[error("tile size must be positive, got {0}")]
    BadTileSize(i32),
    /// Map dimensions must be positive tile counts
    #[error("map dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
    /// The named collision layer is absent from the map
    #[error("collision layer '{0}' not found")]
    MissingCollisionLayer(String),
    /// A tile layer's data array does not match the map dimensions
    #[error("layer '{name}' has {got} tiles, expected {expected}")]
    LayerSizeMismatch {
        name: String,
        got: usize,
        expected: usize,
    },
}

/// Anything that can supply a tile grid.
///
/// Implemented by the Tiled loader internally; tests and tools can provide
/// their own in-memory grids.
pub trait TileSource {
    /// Map width in tiles
    fn width(&self) -> i32;
    /// Map height in tiles
    fn height(&self) -> i32;
    /// Edge length of one (square) tile in pixels
    fn tile_size(&self) -> i32;
    /// Tile id at (col, row); 0 means empty
    fn tile_id(&self, col: i32, row: i32) -> i32;
}

/// A spawn marker from the map's object layer.
#[derive(Debug, Clone)]
pub struct SpawnInfo {
    /// Object class as authored in the editor (e.g. "oxygen_spot")
    pub kind: String,
    /// Top-left corner in world pixels (Tiled convention)
    pub pos: DVec2,
    /// Object extent in world pixels
    pub size: DVec2,
}

impl SpawnInfo {
    /// Center of the spawn rectangle, which is where entities are placed
    pub fn center(&self) -> DVec2 {
        self.pos + self.size * 0.5
    }
}

/// Immutable per-stage collision grid.
pub struct Stage {
    width: i32,
    height: i32,
    tile_size: f64,
    /// Row-major tile ids of the collision layer
    tiles: Vec<i32>,
    spawns: Vec<SpawnInfo>,
}

impl Stage {
    /// Build the grid from any tile source. The source is read exactly once;
    /// the stage keeps no reference to it.
    pub fn from_source<S: TileSource>(source: &S) -> Result<Self, StageError> {
        let (width, height) = (source.width(), source.height());
        let tile_size = source.tile_size();
        if tile_size <= 0 {
            return Err(StageError::BadTileSize(tile_size));
        }
        if width <= 0 || height <= 0 {
            return Err(StageError::BadDimensions { width, height });
        }

        let mut tiles = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                tiles.push(source.tile_id(col, row));
            }
        }

        Ok(Self {
            width,
            height,
            tile_size: f64::from(tile_size),
            tiles,
            spawns: Vec::new(),
        })
    }

    /// Load a stage from a Tiled JSON export.
    ///
    /// Picks the tile layer named `collision_layer` for solidity and collects
    /// every object-layer entry as a [`SpawnInfo`].
    pub fn from_tiled_json(json: &str, collision_layer: &str) -> Result<Self, StageError> {
        let map: TiledMap = serde_json::from_str(json)?;

        let layer = map
            .layers
            .iter()
            .find(|l| l.kind == "tilelayer" && l.name == collision_layer)
            .ok_or_else(|| StageError::MissingCollisionLayer(collision_layer.to_string()))?;

        let expected = (map.width.max(0) as usize) * (map.height.max(0) as usize);
        if layer.data.len() != expected {
            return Err(StageError::LayerSizeMismatch {
                name: layer.name.clone(),
                got: layer.data.len(),
                expected,
            });
        }

        let mut stage = Self::from_source(&TiledSourceView { map: &map, layer })?;

        for layer in map.layers.iter().filter(|l| l.kind == "objectgroup") {
            for obj in &layer.objects {
                stage.spawns.push(SpawnInfo {
                    kind: obj.kind.clone(),
                    pos: DVec2::new(obj.x, obj.y),
                    size: DVec2::new(obj.width, obj.height),
                });
            }
        }

        log::info!(
            "stage loaded: {}x{} tiles of {}px, {} spawns",
            stage.width,
            stage.height,
            stage.tile_size,
            stage.spawns.len()
        );
        Ok(stage)
    }

    /// Is the tile containing this world-space point solid?
    ///
    /// Any point outside the map is solid, so actors are capped at the edges.
    /// In range, a tile is solid iff its stored id is non-zero (id 0 is the
    /// editor's "no tile" sentinel).
    pub fn is_solid(&self, world_x: f64, world_y: f64) -> bool {
        let col = tile_coord(world_x, self.tile_size);
        let row = tile_coord(world_y, self.tile_size);
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            return true;
        }
        self.tiles[(row * self.width + col) as usize] > 0
    }

    /// Map width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tile edge length in pixels
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Total stage height in pixels
    pub fn pixel_height(&self) -> f64 {
        f64::from(self.height) * self.tile_size
    }

    /// Spawn markers collected from the map's object layers
    pub fn spawns(&self) -> &[SpawnInfo] {
        &self.spawns
    }
}

/// Adapter presenting one Tiled tile layer as a [`TileSource`].
struct TiledSourceView<'a> {
    map: &'a TiledMap,
    layer: &'a TiledLayer,
}

impl TileSource for TiledSourceView<'_> {
    fn width(&self) -> i32 {
        self.map.width
    }

    fn height(&self) -> i32 {
        self.map.height
    }

    fn tile_size(&self) -> i32 {
        self.map.tilewidth
    }

    fn tile_id(&self, col: i32, row: i32) -> i32 {
        self.layer.data[(row * self.map.width + col) as usize]
    }
}

/// Subset of the Tiled JSON envelope this crate consumes.
#[derive(Deserialize)]
struct TiledMap {
    width: i32,
    height: i32,
    tilewidth: i32,
    layers: Vec<TiledLayer>,
}

#[derive(Deserialize)]
struct TiledLayer {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Vec<i32>,
    #[serde(default)]
    objects: Vec<TiledObject>,
}

#[derive(Deserialize)]
struct TiledObject {
    // Tiled 1.9 renamed "type" to "class"
    #[serde(rename = "type", alias = "class", default)]
    kind: String,
    x: f64,
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Grid of explicit rows for tests.
    pub struct GridFixture {
        pub tile_size: i32,
        pub rows: Vec<Vec<i32>>,
    }

    impl TileSource for GridFixture {
        fn width(&self) -> i32 {
            self.rows[0].len() as i32
        }

        fn height(&self) -> i32 {
            self.rows.len() as i32
        }

        fn tile_size(&self) -> i32 {
            self.tile_size
        }

        fn tile_id(&self, col: i32, row: i32) -> i32 {
            self.rows[row as usize][col as usize]
        }
    }

    fn three_by_three() -> Stage {
        // Only cell (col 2, row 2) is solid
        Stage::from_source(&GridFixture {
            tile_size: 64,
            rows: vec![vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 1]],
        })
        .unwrap()
    }

    #[test]
    fn test_lookup_matches_tile_ids() {
        let stage = three_by_three();
        assert!(!stage.is_solid(100.0, 100.0)); // floor(100/64) = 1 -> (1,1) empty
        assert!(stage.is_solid(150.0, 150.0)); // floor(150/64) = 2 -> (2,2) solid
    }

    #[test]
    fn test_every_cell_center_matches_source() {
        let fixture = GridFixture {
            tile_size: 16,
            rows: vec![vec![0, 5, 0], vec![2, 0, 1], vec![0, 0, 3]],
        };
        let stage = Stage::from_source(&fixture).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                let x = f64::from(col) * 16.0 + 8.0;
                let y = f64::from(row) * 16.0 + 8.0;
                assert_eq!(stage.is_solid(x, y), fixture.tile_id(col, row) > 0);
            }
        }
    }

    #[test]
    fn test_outside_map_is_solid() {
        let stage = three_by_three();
        assert!(stage.is_solid(-0.1, 100.0));
        assert!(stage.is_solid(100.0, -0.1));
        assert!(stage.is_solid(192.0, 100.0)); // col 3, one past the edge
        assert!(stage.is_solid(100.0, 192.0));
        assert!(stage.is_solid(-10_000.0, -10_000.0));
    }

    #[test]
    fn test_rejects_bad_tile_size() {
        let result = Stage::from_source(&GridFixture {
            tile_size: 0,
            rows: vec![vec![0]],
        });
        assert!(matches!(result, Err(StageError::BadTileSize(0))));
    }

    const TILED_FIXTURE: &str = r#"{
        "width": 2, "height": 2, "tilewidth": 16,
        "layers": [
            { "name": "background", "type": "tilelayer", "data": [9, 9, 9, 9] },
            { "name": "collision_layer", "type": "tilelayer", "data": [0, 1, 0, 0] },
            { "name": "spawns", "type": "objectgroup", "objects": [
                { "type": "player_start", "x": 4.0, "y": 4.0, "width": 8.0, "height": 8.0 },
                { "class": "oxygen_spot", "x": 16.0, "y": 16.0, "width": 16.0, "height": 16.0 }
            ] }
        ]
    }"#;

    #[test]
    fn test_tiled_load_uses_named_collision_layer() {
        let stage = Stage::from_tiled_json(TILED_FIXTURE, "collision_layer").unwrap();
        assert_eq!(stage.width(), 2);
        assert_eq!(stage.height(), 2);
        assert_eq!(stage.tile_size(), 16.0);
        // Background layer is all 9s but must not affect solidity
        assert!(!stage.is_solid(8.0, 8.0));
        assert!(stage.is_solid(24.0, 8.0));
    }

    #[test]
    fn test_tiled_load_collects_spawns() {
        let stage = Stage::from_tiled_json(TILED_FIXTURE, "collision_layer").unwrap();
        assert_eq!(stage.spawns().len(), 2);
        assert_eq!(stage.spawns()[0].kind, "player_start");
        assert_eq!(stage.spawns()[0].center(), DVec2::new(8.0, 8.0));
        // "class" (Tiled 1.9) parses the same as "type"
        assert_eq!(stage.spawns()[1].kind, "oxygen_spot");
    }

    #[test]
    fn test_tiled_load_missing_layer_fails() {
        let result = Stage::from_tiled_json(TILED_FIXTURE, "no_such_layer");
        assert!(matches!(result, Err(StageError::MissingCollisionLayer(_))));
    }

    #[test]
    fn test_tiled_load_size_mismatch_fails() {
        let json = r#"{
            "width": 2, "height": 2, "tilewidth": 16,
            "layers": [ { "name": "collision_layer", "type": "tilelayer", "data": [1, 2, 3] } ]
        }"#;
        let result = Stage::from_tiled_json(json, "collision_layer");
        assert!(matches!(result, Err(StageError::LayerSizeMismatch { .. })));
    }

    #[test]
    fn test_tiled_load_garbage_fails() {
        assert!(matches!(
            Stage::from_tiled_json("not json", "collision_layer"),
            Err(StageError::Parse(_))
        ));
    }

    proptest! {
        /// Any point whose tile coordinate falls outside the map is solid,
        /// even on an otherwise empty grid.
        #[test]
        fn prop_void_beyond_map_is_solid(x in -1.0e5f64..1.0e5, y in -1.0e5f64..1.0e5) {
            let stage = Stage::from_source(&GridFixture {
                tile_size: 16,
                rows: vec![vec![0; 8]; 8],
            }).unwrap();
            let col = crate::tile_coord(x, 16.0);
            let row = crate::tile_coord(y, 16.0);
            let outside = col < 0 || row < 0 || col >= 8 || row >= 8;
            prop_assert_eq!(stage.is_solid(x, y), outside);
        }
    }
}
