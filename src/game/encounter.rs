use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::assets::AssetStore;
use crate::battle::{hostile_catalog, Opponent};
use crate::world::Tile;

/// Per-tile encounter odds, rolled once per completed player move. Owns its
/// RNG so a fixed seed replays the whole session.
pub struct EncounterResolver {
    rng: ChaCha8Rng,
}

impl EncounterResolver {
    pub fn new(rng: ChaCha8Rng) -> Self {
        EncounterResolver { rng }
    }

    pub fn trigger_chance(tile: Tile) -> f64 {
        match tile {
            Tile::WildGrass => 0.10,
            Tile::Bush => 0.05,
            Tile::Forest => 0.15,
            Tile::Water | Tile::TameGrass => 0.0,
        }
    }

    /// Independent uniform draw per call.
    pub fn roll(&mut self, tile: Tile) -> bool {
        let chance = Self::trigger_chance(tile);
        chance > 0.0 && self.rng.gen_bool(chance)
    }

    /// Uniform pick over the hostile catalog; the opponent comes back at
    /// full health with its art resolved.
    pub fn spawn(&mut self, assets: &dyn AssetStore) -> Opponent {
        let catalog = hostile_catalog();
        let template = catalog[self.rng.gen_range(0..catalog.len())];
        template(assets)
    }
}
