use std::rc::Rc;

use crate::assets::Image;
use crate::entities::Entity;
use crate::geometry::Rect;
use crate::platform::Surface;
use crate::settings::DynamicSettings;

pub struct Ship {
    image: Rc<Image>,
    rect: Rect,
    screen: Rect,
    /// Exact horizontal position; `rect.x` is its truncation
    x: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    pub fn new(image: Rc<Image>, screen: Rect) -> Self {
        let rect = image.rect();
        let mut ship = Self {
            image,
            rect,
            screen,
            x: 0.0,
            moving_left: false,
            moving_right: false,
        };
        ship.center();
        ship
    }

    /// Park the ship at the bottom center of the screen
    pub fn center(&mut self) {
        self.rect.set_mid_bottom(self.screen.mid_bottom());
        self.x = self.rect.x as f32;
    }

    #[cfg(test)]
    pub fn x(&self) -> f32 {
        self.x
    }

    fn fits(&self, x: f32) -> bool {
        let left = x as i32;
        left >= self.screen.left() && left + self.rect.w <= self.screen.right()
    }
}

impl Entity for Ship {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dynamic: &DynamicSettings) {
        if self.moving_right && self.fits(self.x + dynamic.ship_speed) {
            self.x += dynamic.ship_speed;
        }
        if self.moving_left && self.fits(self.x - dynamic.ship_speed) {
            self.x -= dynamic.ship_speed;
        }
        self.rect.x = self.x as i32;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(&self.image, self.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rgb;
    use proptest::prelude::*;

    fn ship() -> Ship {
        let image = Image::parse(&"#".repeat(12), 5, Rgb(0, 0, 0)).unwrap();
        Ship::new(Rc::new(image), Rect::new(0, 0, 1200, 800))
    }

    #[test]
    fn starts_bottom_center() {
        let ship = ship();
        assert_eq!(ship.rect(), Rect::new(570, 795, 60, 5));
        assert_eq!(ship.x(), 570.0);
    }

    #[test]
    fn moves_by_ship_speed() {
        let mut ship = ship();
        let dynamic = DynamicSettings::default();
        ship.moving_right = true;
        ship.update(&dynamic);
        ship.update(&dynamic);
        assert_eq!(ship.x(), 573.0);
        assert_eq!(ship.rect().x, 573);

        ship.moving_right = false;
        ship.moving_left = true;
        ship.update(&dynamic);
        assert_eq!(ship.x(), 571.5);
        assert_eq!(ship.rect().x, 571);
    }

    #[test]
    fn both_flags_cancel_out() {
        let mut ship = ship();
        ship.moving_left = true;
        ship.moving_right = true;
        ship.update(&DynamicSettings::default());
        assert_eq!(ship.x(), 570.0);
    }

    #[test]
    fn stops_at_screen_edges() {
        let mut ship = ship();
        let dynamic = DynamicSettings {
            ship_speed: 7.0,
            ..DynamicSettings::default()
        };
        ship.moving_right = true;
        for _ in 0..200 {
            ship.update(&dynamic);
        }
        assert!(ship.rect().right() <= 1200);
        assert!(ship.rect().right() > 1200 - 7);

        ship.moving_right = false;
        ship.moving_left = true;
        for _ in 0..400 {
            ship.update(&dynamic);
        }
        assert!(ship.rect().left() >= 0);
        assert!(ship.rect().left() < 7);
    }

    #[test]
    fn center_resets_position() {
        let mut ship = ship();
        ship.moving_left = true;
        for _ in 0..50 {
            ship.update(&DynamicSettings::default());
        }
        ship.center();
        assert_eq!(ship.rect().x, 570);
        assert_eq!(ship.x(), 570.0);
    }

    proptest! {
        #[test]
        fn never_leaves_the_screen(
            speed in 0.1f32..40.0,
            moves in prop::collection::vec((any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut ship = ship();
            let dynamic = DynamicSettings {
                ship_speed: speed,
                ..DynamicSettings::default()
            };
            for (left, right) in moves {
                ship.moving_left = left;
                ship.moving_right = right;
                ship.update(&dynamic);
                prop_assert!(ship.rect().left() >= 0);
                prop_assert!(ship.rect().right() <= 1200);
            }
        }
    }
}
