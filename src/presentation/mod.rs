//! Presentation tier: everything a client needs to draw the game, computed
//! from engine state, plus the wall-clock delays between turn steps.

pub mod clock;
pub mod render;
pub mod view;

pub use clock::delay_for;
pub use render::render_board;
pub use view::BoardView;
