pub mod display;
pub mod noise;

use noise::NoiseField;

/// Spatial scale for noise sampling; one world cell steps 0.1 through the
/// noise lattice.
pub const NOISE_SCALE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Water,
    WildGrass,
    Bush,
    Forest,
    TameGrass,
}

impl Tile {
    pub fn glyph(&self) -> char {
        match self {
            Tile::Water => '~',
            Tile::WildGrass => ',',
            Tile::Bush => '"',
            Tile::Forest => '♣',
            Tile::TameGrass => '.',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tile::Water => "water",
            Tile::WildGrass => "wild grass",
            Tile::Bush => "bush",
            Tile::Forest => "forest",
            Tile::TameGrass => "tame grass",
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(self, Tile::Water)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// Fixed-size tile grid, generated once at startup and immutable afterward.
/// The player marker is composited at render time, never written into the
/// grid.
pub struct World {
    pub rows: usize,
    pub cols: usize,
    tiles: Vec<Tile>,
}

impl World {
    pub fn from_tiles(rows: usize, cols: usize, tiles: Vec<Tile>) -> Self {
        assert_eq!(tiles.len(), rows * cols);
        World { rows, cols, tiles }
    }

    pub fn filled(rows: usize, cols: usize, fill: Tile) -> Self {
        World {
            rows,
            cols,
            tiles: vec![fill; rows * cols],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.tiles[y * self.cols + x]
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get(x as usize, y as usize).is_walkable()
    }

    /// First non-water cell in row-major order; used for the starting
    /// position and the post-defeat respawn.
    pub fn find_spawn(&self) -> Position {
        for y in 0..self.rows {
            for x in 0..self.cols {
                if self.get(x, y).is_walkable() {
                    return Position::new(x as i32, y as i32);
                }
            }
        }
        Position::new(0, 0)
    }
}

pub struct TerrainGenerator<'a> {
    noise: &'a NoiseField,
}

impl<'a> TerrainGenerator<'a> {
    pub fn new(noise: &'a NoiseField) -> Self {
        TerrainGenerator { noise }
    }

    pub fn generate(&self, cols: usize, rows: usize) -> World {
        let mut tiles = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let n = self
                    .noise
                    .sample(row as f64 * NOISE_SCALE, col as f64 * NOISE_SCALE);
                tiles.push(classify((n + 1.0) / 2.0));
            }
        }

        World { rows, cols, tiles }
    }
}

/// Ascending threshold bands over the normalized [0, 1] noise value; the
/// bands are cumulative, so the order is load-bearing. The thin bush band
/// keeps that biome rare on purpose.
pub fn classify(value: f64) -> Tile {
    if value < 0.35 {
        Tile::Water
    } else if value < 0.45 {
        Tile::WildGrass
    } else if value < 0.453 {
        Tile::Bush
    } else if value < 0.55 {
        Tile::Forest
    } else {
        Tile::TameGrass
    }
}
