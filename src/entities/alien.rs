use std::rc::Rc;

use crate::assets::Image;
use crate::entities::Entity;
use crate::geometry::Rect;
use crate::platform::Surface;
use crate::settings::DynamicSettings;

#[derive(Clone)]
pub struct Alien {
    image: Rc<Image>,
    rect: Rect,
    x: f32,
}

impl Alien {
    pub fn new(image: Rc<Image>, x: i32, y: i32) -> Self {
        let mut rect = image.rect();
        rect.x = x;
        rect.y = y;
        Self {
            image,
            rect,
            x: x as f32,
        }
    }

    pub fn at_edge(&self, screen: &Rect) -> bool {
        self.rect.right() >= screen.right() || self.rect.left() <= 0
    }

    pub fn drop_by(&mut self, distance: i32) {
        self.rect.y += distance;
    }
}

impl Entity for Alien {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dynamic: &DynamicSettings) {
        self.x += dynamic.alien_speed * dynamic.fleet_direction.sign();
        self.rect.x = self.x as i32;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(&self.image, self.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FleetDirection, Rgb};

    fn alien_at(x: i32) -> Alien {
        let image = Image::parse(&"#".repeat(12), 5, Rgb(0, 0, 0)).unwrap();
        Alien::new(Rc::new(image), x, 50)
    }

    #[test]
    fn edge_detection() {
        let screen = Rect::new(0, 0, 1200, 800);
        assert!(alien_at(0).at_edge(&screen));
        assert!(alien_at(1140).at_edge(&screen));
        assert!(!alien_at(1).at_edge(&screen));
        assert!(!alien_at(1139).at_edge(&screen));
    }

    #[test]
    fn moves_with_fleet_direction() {
        let mut alien = alien_at(60);
        let mut dynamic = DynamicSettings {
            alien_speed: 2.5,
            ..DynamicSettings::default()
        };
        alien.update(&dynamic);
        assert_eq!(alien.rect().x, 62);

        dynamic.fleet_direction = FleetDirection::Left;
        alien.update(&dynamic);
        alien.update(&dynamic);
        assert_eq!(alien.rect().x, 57);
        assert_eq!(alien.rect().y, 50);
    }
}
