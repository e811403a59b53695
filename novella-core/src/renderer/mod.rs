pub mod driver;
pub mod terminal;

use crate::event::{InputEvent, OutputEvent};

/// Presentation side of the engine. Returns the player's answer when an
/// event needs one.
pub trait Renderer {
    fn render(&mut self, out: &OutputEvent) -> Option<InputEvent>;
}
