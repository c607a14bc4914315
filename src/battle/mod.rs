use crate::assets::AssetStore;

/// Fixed attack catalog shared by the player and every opponent. Opponents
/// reference entries by index instead of owning copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attack {
    pub name: &'static str,
    pub damage: i32,
}

pub const ATTACKS: [Attack; 4] = [
    Attack { name: "Tackle", damage: 4 },
    Attack { name: "Scratch", damage: 3 },
    Attack { name: "Bite", damage: 5 },
    Attack { name: "Headbutt", damage: 6 },
];

#[derive(Debug, Clone)]
pub struct Opponent {
    pub name: String,
    pub art: String,
    pub health: i32,
    pub max_health: i32,
    /// Indices into `ATTACKS`, in preference order.
    pub attacks: Vec<usize>,
}

impl Opponent {
    pub fn new(name: &str, asset_name: &str, health: i32, attacks: Vec<usize>, assets: &dyn AssetStore) -> Self {
        Opponent {
            name: name.to_string(),
            // Missing art is non-fatal; the battle screen just shows an
            // empty block.
            art: assets.load(asset_name).unwrap_or_default(),
            health,
            max_health: health,
            attacks,
        }
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

pub fn create_boar(assets: &dyn AssetStore) -> Opponent {
    Opponent::new("Wild Boar", "boar", 18, vec![0, 3], assets)
}

pub fn create_wolf(assets: &dyn AssetStore) -> Opponent {
    Opponent::new("Wolf", "wolf", 14, vec![2, 0], assets)
}

pub fn create_fox(assets: &dyn AssetStore) -> Opponent {
    Opponent::new("Fox", "fox", 10, vec![1, 2], assets)
}

pub fn create_serpent(assets: &dyn AssetStore) -> Opponent {
    Opponent::new("Marsh Serpent", "serpent", 12, vec![2, 1], assets)
}

pub fn hostile_catalog() -> &'static [fn(&dyn AssetStore) -> Opponent] {
    &[create_boar, create_wolf, create_fox, create_serpent]
}

/// Result of one resolved turn, carried back to the message layer.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub attack: Attack,
    pub counter: Attack,
    pub opponent_defeated: bool,
    pub player_defeated: bool,
}

pub struct Battle {
    pub opponent: Opponent,
}

impl Battle {
    pub fn new(opponent: Opponent) -> Self {
        Battle { opponent }
    }

    /// Resolves one full turn atomically: the chosen attack lands on the
    /// opponent, then the opponent counterattacks with its first repertoire
    /// entry (the current intended behavior, not yet randomized). Health is
    /// floored at zero; terminal conditions are reported, not acted on.
    pub fn resolve_turn(&mut self, slot: usize, player_health: &mut i32) -> TurnOutcome {
        let attack = ATTACKS[slot.min(ATTACKS.len() - 1)];
        self.opponent.take_damage(attack.damage);

        let counter = ATTACKS[self.opponent.attacks[0]];
        *player_health = (*player_health - counter.damage).max(0);

        TurnOutcome {
            attack,
            counter,
            opponent_defeated: self.opponent.is_defeated(),
            player_defeated: *player_health <= 0,
        }
    }
}
