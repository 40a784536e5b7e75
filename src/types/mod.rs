pub mod game;
pub mod signals;

pub use game::*;
pub use signals::*;
