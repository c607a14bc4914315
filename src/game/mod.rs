pub mod encounter;

use std::time::{Duration, Instant};

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assets::AssetStore;
use crate::battle::{Battle, Opponent, ATTACKS};
use crate::game::encounter::EncounterResolver;
use crate::ui::{Frontend, MessageQueue, Panel, MIN_BOX_COLS};
use crate::world::display::Viewport;
use crate::world::noise::NoiseField;
use crate::world::{Position, TerrainGenerator, World};

/// Height of the message box under the map view.
pub const BOX_ROWS: usize = 9;

pub const PLAYER_MAX_HEALTH: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Exploring,
    Battling,
}

#[derive(Debug, Clone, Copy)]
pub struct GameOptions {
    pub seed: u64,
    pub fps: u32,
    pub scale: usize,
    pub world_rows: usize,
    pub world_cols: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            seed: 0,
            fps: 30,
            scale: 2,
            world_rows: 64,
            world_cols: 64,
        }
    }
}

pub struct Player {
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
}

/// Top-level state machine. One call to `tick` per frame: input, state
/// update, message-queue countdown; `render_screen` composes the frame the
/// frontend draws.
pub struct Game<F: Frontend, A: AssetStore> {
    pub frontend: F,
    pub assets: A,
    pub world: World,
    pub player: Player,
    pub state: GameState,
    pub messages: MessageQueue,
    pub resolver: EncounterResolver,
    pub viewport: Viewport,
    pub battle: Option<Battle>,
    pub pending: Option<Opponent>,
    pub able_to_move: bool,
    frame_budget: Duration,
    box_cols: usize,
}

impl<F: Frontend, A: AssetStore> Game<F, A> {
    pub fn new(frontend: F, assets: A, options: GameOptions) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let field = NoiseField::new(&mut rng);
        let world = TerrainGenerator::new(&field).generate(options.world_cols, options.world_rows);
        Ok(Self::with_world(frontend, assets, options, world))
    }

    /// Builds a game around an existing world; `new` generates one first.
    pub fn with_world(frontend: F, assets: A, options: GameOptions, world: World) -> Self {
        let (cols, rows) = frontend.size();

        // Leave room for the frame border and the message box, then turn
        // terminal cells into world cells at the configured magnification.
        let scale = options.scale.max(1);
        let usable_cols = (cols as usize).saturating_sub(2);
        let usable_rows = (rows as usize).saturating_sub(2 + BOX_ROWS);
        let view_cols = (usable_cols / scale).clamp(1, world.cols);
        let view_rows = (usable_rows / scale).clamp(1, world.rows);
        let viewport = Viewport::new(view_rows, view_cols, scale);
        let box_cols = (view_cols * scale).max(MIN_BOX_COLS);

        let player = Player {
            position: world.find_spawn(),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
        };

        let resolver = EncounterResolver::new(ChaCha8Rng::seed_from_u64(options.seed));

        let mut game = Game {
            frontend,
            assets,
            world,
            player,
            state: GameState::Exploring,
            messages: MessageQueue::new(Panel::new("STATUS", "", vec![])),
            resolver,
            viewport,
            battle: None,
            pending: None,
            able_to_move: true,
            frame_budget: Duration::from_micros(1_000_000 / options.fps.max(1) as u64),
            box_cols,
        };
        let base = game.base_panel();
        game.messages.set_base(base);
        game
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            let key = self.frontend.poll_key()?;
            if !self.tick(key)? {
                break;
            }
            let screen = self.render_screen();
            self.frontend.draw(&screen)?;

            // Idle out the rest of the frame budget instead of spinning.
            if let Some(idle) = self.frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(idle);
            }
        }
        self.frontend.cleanup()
    }

    /// One logical frame. Returns false when the player quits.
    pub fn tick(&mut self, input: Option<char>) -> Result<bool> {
        if input == Some('q') {
            return Ok(false);
        }

        match self.state {
            GameState::Exploring => self.tick_exploring(input)?,
            GameState::Battling => self.tick_battling(input),
        }

        let base = self.base_panel();
        self.messages.advance(base);
        Ok(true)
    }

    fn tick_exploring(&mut self, input: Option<char>) -> Result<()> {
        if self.able_to_move {
            if let Some((dx, dy)) = input.and_then(direction) {
                self.try_move(dx, dy);
            }
        }

        // The battle starts once the "appeared" panel has been seen out.
        if self.messages.is_drained() {
            if let Some(opponent) = self.pending.take() {
                self.battle = Some(Battle::new(opponent));
                self.state = GameState::Battling;
                let base = self.base_panel();
                self.messages.set_base(base);
                self.frontend.clear()?;
            }
        }
        Ok(())
    }

    fn try_move(&mut self, dx: i32, dy: i32) {
        let nx = self.player.position.x + dx;
        let ny = self.player.position.y + dy;

        // Off-world moves and water are rejected silently: no state change,
        // no message.
        if !self.world.is_walkable(nx, ny) {
            return;
        }
        self.player.position = Position::new(nx, ny);
        let base = self.base_panel();
        self.messages.set_base(base);

        // Rolled once per completed move, never for rejected ones.
        let tile = self.world.get(nx as usize, ny as usize);
        if self.resolver.roll(tile) {
            let opponent = self.resolver.spawn(&self.assets);
            self.messages.push(Panel::new(
                "!",
                format!("A wild {} appeared!", opponent.name),
                vec![],
            ));
            self.able_to_move = false;
            self.pending = Some(opponent);
        }
    }

    fn tick_battling(&mut self, input: Option<char>) {
        // A turn is accepted only once the previous turn's result text has
        // fully expired; everything else is ignored, movement included.
        if !self.messages.is_drained() {
            return;
        }
        let Some(slot) = input.and_then(attack_slot) else {
            return;
        };
        let Some(battle) = self.battle.as_mut() else {
            return;
        };

        let outcome = battle.resolve_turn(slot, &mut self.player.health);
        let name = battle.opponent.name.clone();

        if outcome.opponent_defeated {
            self.messages.clear();
            self.messages.push(Panel::new(
                "VICTORY",
                format!("The wild {} was defeated!", name),
                vec![],
            ));
            self.battle = None;
            self.state = GameState::Exploring;
            self.able_to_move = true;
        } else if outcome.player_defeated {
            // Defeat is a respawn, not a game over: full health back at the
            // spawn point.
            self.messages.clear();
            self.messages.push(Panel::new(
                "DEFEAT",
                format!(
                    "The wild {} overwhelmed you. You blacked out and came to where you started.",
                    name
                ),
                vec![],
            ));
            self.battle = None;
            self.state = GameState::Exploring;
            self.able_to_move = true;
            self.player.health = self.player.max_health;
            self.player.position = self.world.find_spawn();
        } else {
            // LIFO stack: the damage-received panel goes in first so the
            // damage-dealt panel displays first.
            self.messages.push(Panel::new(
                name.to_uppercase(),
                format!(
                    "The wild {} hit back with {} for {} damage!",
                    name, outcome.counter.name, outcome.counter.damage
                ),
                vec![],
            ));
            self.messages.push(Panel::new(
                "ATTACK",
                format!(
                    "You used {} and dealt {} damage!",
                    outcome.attack.name, outcome.attack.damage
                ),
                vec![],
            ));
        }
    }

    /// The persistent bottom-of-stack panel, rebuilt from live status: the
    /// exploration status line, or the attack menu during a battle.
    pub fn base_panel(&self) -> Panel {
        match self.state {
            GameState::Exploring => {
                let x = self.player.position.x;
                let y = self.player.position.y;
                let tile = self.world.get(x as usize, y as usize);
                Panel::new(
                    "STATUS",
                    "",
                    vec![
                        format!("HP {}/{}", self.player.health, self.player.max_health),
                        format!("({}, {}) on {}", x, y, tile.name()),
                        "Move: w/a/s/d   Quit: q".to_string(),
                    ],
                )
            }
            GameState::Battling => match &self.battle {
                Some(battle) => {
                    let mut options: Vec<String> = ATTACKS
                        .iter()
                        .enumerate()
                        .map(|(i, attack)| {
                            format!("{}. {} ({} dmg)", i + 1, attack.name, attack.damage)
                        })
                        .collect();
                    options.push(String::new());
                    options.push(format!(
                        "{} HP {}   Your HP {}",
                        battle.opponent.name, battle.opponent.health, self.player.health
                    ));
                    Panel::new(battle.opponent.name.to_uppercase(), "", options)
                }
                None => Panel::new("BATTLE", "", vec![]),
            },
        }
    }

    /// Composes the full frame: map view (or opponent art in battle) above
    /// the current message box.
    pub fn render_screen(&self) -> String {
        let mut screen = String::new();

        match self.state {
            GameState::Exploring => {
                screen.push_str(&self.viewport.render(&self.world, self.player.position));
            }
            GameState::Battling => {
                if let Some(battle) = &self.battle {
                    if !battle.opponent.art.is_empty() {
                        screen.push_str(&battle.opponent.art);
                        if !battle.opponent.art.ends_with('\n') {
                            screen.push('\n');
                        }
                    }
                }
            }
        }

        let panel = if self.messages.is_drained() {
            self.base_panel()
        } else {
            self.messages.peek().clone()
        };
        for line in panel.render(BOX_ROWS, self.box_cols) {
            screen.push_str(&line);
            screen.push('\n');
        }
        screen
    }
}

fn direction(key: char) -> Option<(i32, i32)> {
    match key {
        'w' => Some((0, -1)),
        's' => Some((0, 1)),
        'a' => Some((-1, 0)),
        'd' => Some((1, 0)),
        _ => None,
    }
}

fn attack_slot(key: char) -> Option<usize> {
    match key {
        '1'..='4' => Some(key as usize - '1' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    struct StubFrontend {
        pub clears: usize,
    }

    impl Frontend for StubFrontend {
        fn poll_key(&mut self) -> Result<Option<char>> {
            Ok(None)
        }
        fn size(&self) -> (u16, u16) {
            (40, 24)
        }
        fn draw(&mut self, _block: &str) -> Result<()> {
            Ok(())
        }
        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            Ok(())
        }
    }

    struct NoAssets;

    impl AssetStore for NoAssets {
        fn load(&self, _name: &str) -> Option<String> {
            None
        }
    }

    fn game_on(world: World) -> Game<StubFrontend, NoAssets> {
        Game::with_world(
            StubFrontend { clears: 0 },
            NoAssets,
            GameOptions {
                seed: 5,
                scale: 1,
                ..GameOptions::default()
            },
            world,
        )
    }

    #[test]
    fn moving_into_water_is_rejected() {
        let mut tiles = vec![Tile::TameGrass; 9];
        tiles[1] = Tile::Water; // east of the spawn at (0, 0)
        let mut game = game_on(World::from_tiles(3, 3, tiles));
        assert_eq!(game.player.position, Position::new(0, 0));

        assert!(game.tick(Some('d')).unwrap());
        assert_eq!(game.player.position, Position::new(0, 0));
    }

    #[test]
    fn moving_off_world_is_rejected() {
        let mut game = game_on(World::filled(3, 3, Tile::TameGrass));
        assert!(game.tick(Some('w')).unwrap());
        assert!(game.tick(Some('a')).unwrap());
        assert_eq!(game.player.position, Position::new(0, 0));
    }

    #[test]
    fn completed_moves_update_position_and_status() {
        let mut game = game_on(World::filled(3, 3, Tile::TameGrass));
        assert!(game.tick(Some('s')).unwrap());
        assert!(game.tick(Some('d')).unwrap());
        assert_eq!(game.player.position, Position::new(1, 1));
        assert!(game.base_panel().options[1].contains("(1, 1)"));
    }

    #[test]
    fn quit_input_ends_the_loop() {
        let mut game = game_on(World::filled(3, 3, Tile::TameGrass));
        assert!(!game.tick(Some('q')).unwrap());
    }

    #[test]
    fn tame_grass_never_triggers_an_encounter() {
        let mut game = game_on(World::filled(8, 8, Tile::TameGrass));
        for i in 0..500 {
            let key = if i % 2 == 0 { 'd' } else { 'a' };
            assert!(game.tick(Some(key)).unwrap());
        }
        assert_eq!(game.state, GameState::Exploring);
        assert!(game.able_to_move);
        assert!(game.pending.is_none());
    }
}
