use crate::geometry::Rect;
use crate::platform::{Surface, TextImage, TextRenderer};
use crate::settings::Rgb;

const WIDTH: i32 = 200;
const HEIGHT: i32 = 50;
const BUTTON_COLOR: Rgb = Rgb(0, 255, 0);
const TEXT_COLOR: Rgb = Rgb(255, 255, 255);

/// Clickable start control, centered on the screen
pub struct Button {
    rect: Rect,
    msg: String,
    msg_image: TextImage,
}

impl Button {
    pub fn new<T: TextRenderer + ?Sized>(screen: Rect, msg: &str, text: &T) -> Self {
        let mut rect = Rect::new(0, 0, WIDTH, HEIGHT);
        rect.set_center(screen.center());
        let msg_image = Self::prep_msg(rect, msg, text);
        Self {
            rect,
            msg: msg.to_string(),
            msg_image,
        }
    }

    fn prep_msg<T: TextRenderer + ?Sized>(rect: Rect, msg: &str, text: &T) -> TextImage {
        let mut image = text.render_text(msg, TEXT_COLOR, BUTTON_COLOR);
        image.rect.set_center(rect.center());
        image
    }

    /// Re-render the label after the text metrics changed
    pub fn refresh<T: TextRenderer + ?Sized>(&mut self, text: &T) {
        self.msg_image = Self::prep_msg(self.rect, &self.msg, text);
    }

    #[cfg(test)]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains_point(x, y)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, BUTTON_COLOR);
        surface.blit_text(&self.msg_image);
    }
}
