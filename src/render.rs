/// The rendering seam.
///
/// The engine and entities only ever talk to a `Renderer`; what a sprite
/// looks like is the implementor's business.  Coordinates are playfield
/// pixels with a top-left origin.

use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Enemy,
    Player,
    Projectile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// Small left-anchored status text.
    Hud,
    /// Large overlay text centred on `x`.
    Banner,
}

pub trait Renderer {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> io::Result<()>;
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) -> io::Result<()>;
}
