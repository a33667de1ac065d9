pub mod clock;
pub mod estimation;
pub mod game;
pub mod ticker;
