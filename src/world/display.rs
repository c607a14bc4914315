use super::{Position, World};

pub const PLAYER_GLYPH: char = '@';

/// Scrollable camera over the world grid. The view is a `view_rows x
/// view_cols` window of world cells, each magnified into a `scale x scale`
/// block of identical characters for terminal readability.
pub struct Viewport {
    pub view_rows: usize,
    pub view_cols: usize,
    pub scale: usize,
}

impl Viewport {
    pub fn new(view_rows: usize, view_cols: usize, scale: usize) -> Self {
        Viewport {
            view_rows: view_rows.max(1),
            view_cols: view_cols.max(1),
            scale: scale.max(1),
        }
    }

    /// Top-left world cell of the view, centered on the player and clamped
    /// so the window never leaves world bounds. When the requested view is
    /// larger than the world the start clamps to 0 instead of going
    /// negative.
    pub fn anchor(&self, world: &World, player: Position) -> (usize, usize) {
        let max_row = world.rows.saturating_sub(self.view_rows) as i32;
        let max_col = world.cols.saturating_sub(self.view_cols) as i32;
        let start_row = (player.y - self.view_rows as i32 / 2).clamp(0, max_row);
        let start_col = (player.x - self.view_cols as i32 / 2).clamp(0, max_col);
        (start_row as usize, start_col as usize)
    }

    /// Renders the visible window as a newline-terminated text block,
    /// row-major, each magnified row emitted fully before the next. The
    /// player glyph is composited over the terrain here; the grid itself is
    /// never touched.
    pub fn render(&self, world: &World, player: Position) -> String {
        let (start_row, start_col) = self.anchor(world, player);
        let end_row = (start_row + self.view_rows).min(world.rows);
        let end_col = (start_col + self.view_cols).min(world.cols);

        let mut out =
            String::with_capacity((end_row - start_row) * self.scale * (self.view_cols * self.scale + 1));

        for row in start_row..end_row {
            let mut line = String::with_capacity(self.view_cols * self.scale);
            for col in start_col..end_col {
                let glyph = if player.x == col as i32 && player.y == row as i32 {
                    PLAYER_GLYPH
                } else {
                    world.get(col, row).glyph()
                };
                for _ in 0..self.scale {
                    line.push(glyph);
                }
            }
            for _ in 0..self.scale {
                out.push_str(&line);
                out.push('\n');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    #[test]
    fn anchor_stays_within_world_bounds() {
        let world = World::filled(20, 30, Tile::TameGrass);
        let viewport = Viewport::new(8, 10, 1);

        for y in 0..20 {
            for x in 0..30 {
                let (row, col) = viewport.anchor(&world, Position::new(x, y));
                assert!(row <= 20 - 8);
                assert!(col <= 30 - 10);
            }
        }
    }

    #[test]
    fn anchor_clamps_to_zero_when_view_exceeds_world() {
        let world = World::filled(4, 4, Tile::TameGrass);
        let viewport = Viewport::new(10, 10, 2);
        assert_eq!(viewport.anchor(&world, Position::new(3, 3)), (0, 0));
    }

    #[test]
    fn player_cell_is_always_inside_the_rendered_window() {
        let world = World::filled(16, 16, Tile::TameGrass);
        let viewport = Viewport::new(6, 6, 1);

        for y in 0..16 {
            for x in 0..16 {
                let block = viewport.render(&world, Position::new(x, y));
                assert!(
                    block.contains(PLAYER_GLYPH),
                    "player at ({}, {}) fell outside the view",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn cells_are_magnified_into_scale_blocks() {
        let world = World::filled(4, 4, Tile::TameGrass);
        let viewport = Viewport::new(4, 4, 3);
        let block = viewport.render(&world, Position::new(0, 0));

        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 4 * 3);
        // Top-left world cell holds the player; its glyph spans a 3x3 block.
        for line in &lines[..3] {
            assert!(line.starts_with("@@@"));
            assert_eq!(line.chars().count(), 4 * 3);
        }
        assert!(lines[3].starts_with("..."));
    }

    #[test]
    fn oversized_view_renders_the_whole_world_without_panic() {
        let world = World::filled(3, 5, Tile::WildGrass);
        let viewport = Viewport::new(10, 10, 2);
        let block = viewport.render(&world, Position::new(2, 1));

        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 3 * 2);
        assert_eq!(lines[0].chars().count(), 5 * 2);
    }
}
