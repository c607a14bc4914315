pub mod assets;
pub mod battle;
pub mod game;
pub mod ui;
pub mod world;

pub use assets::*;
pub use battle::*;
pub use game::*;
pub use ui::*;
pub use world::*;
