//! Platform abstraction layer
//!
//! The game core only talks to the outside world through these traits:
//! - `Surface`: a fixed-size drawable region
//! - `TextRenderer`: turns strings into positioned text images
//! - `Platform`: pointer visibility and the blocking pause
//!
//! Input arrives as `InputEvent`s in logical pixel space.

use std::time::Duration;

use crate::assets::Image;
use crate::geometry::Rect;
use crate::settings::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Quit,
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: i32, y: i32 },
}

/// Rendered text with its bounding rect. Callers move `rect` to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextImage {
    pub text: String,
    pub rect: Rect,
    pub fg: Rgb,
    pub bg: Rgb,
}

pub trait Surface {
    /// Drawable size in logical pixels
    fn size(&self) -> (i32, i32);
    fn fill(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn blit(&mut self, image: &Image, rect: Rect);
    fn blit_text(&mut self, text: &TextImage);
    fn present(&mut self);
}

pub trait TextRenderer {
    fn render_text(&self, text: &str, fg: Rgb, bg: Rgb) -> TextImage;
}

pub trait Platform: TextRenderer {
    fn set_pointer_visible(&mut self, visible: bool);
    /// Block the whole loop for `duration`
    fn pause(&mut self, duration: Duration);
}
