use crate::entities::Entity;
use crate::geometry::Rect;
use crate::platform::Surface;
use crate::settings::{DynamicSettings, Rgb, Settings};

pub struct Projectile {
    rect: Rect,
    y: f32,
    color: Rgb,
}

impl Projectile {
    /// A new projectile whose mid-top sits at `muzzle` (the ship's mid-top)
    pub fn new(settings: &Settings, muzzle: (i32, i32)) -> Self {
        let mut rect = Rect::new(0, 0, settings.bullet_width, settings.bullet_height);
        rect.set_mid_top(muzzle);
        Self {
            rect,
            y: rect.y as f32,
            color: settings.bullet_color,
        }
    }

    /// Past the top of the screen
    pub fn is_spent(&self) -> bool {
        self.rect.bottom() <= 0
    }
}

impl Entity for Projectile {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dynamic: &DynamicSettings) {
        self.y -= dynamic.bullet_speed;
        self.rect.y = self.y as i32;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_at_muzzle() {
        let p = Projectile::new(&Settings::default(), (600, 752));
        assert_eq!(p.rect(), Rect::new(599, 752, 3, 15));
    }

    #[test]
    fn travels_up_until_spent() {
        let settings = Settings::default();
        let mut p = Projectile::new(&settings, (600, 30));
        let mut ticks = 0;
        while !p.is_spent() {
            p.update(&settings.dynamic);
            ticks += 1;
        }
        // bottom starts at 45 and must reach 0 at 3 px per tick
        assert_eq!(ticks, 15);
        assert!(p.rect().bottom() <= 0);
    }
}
