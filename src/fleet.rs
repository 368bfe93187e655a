//! The alien fleet: grid layout, collective motion, edge reversal.

use std::rc::Rc;

use crate::assets::Image;
use crate::entities::{Alien, Entity};
use crate::geometry::Rect;
use crate::platform::Surface;
use crate::settings::DynamicSettings;

/// Grid dimensions for a fleet. Aliens are separated by one alien
/// width/height in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: i32,
    pub rows: i32,
    alien_w: i32,
    alien_h: i32,
}

impl FleetLayout {
    pub fn compute(alien_w: i32, alien_h: i32, ship_h: i32, screen_w: i32, screen_h: i32) -> Self {
        let available_x = screen_w - 2 * alien_w;
        let available_y = screen_h - 3 * alien_h - ship_h;
        Self {
            columns: (available_x / (2 * alien_w)).max(0),
            rows: (available_y / (2 * alien_h)).max(0),
            alien_w,
            alien_h,
        }
    }

    pub fn len(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Top-left corner of every slot, row by row
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |col| {
                (
                    self.alien_w + 2 * self.alien_w * col,
                    self.alien_h + 2 * self.alien_h * row,
                )
            })
        })
    }
}

pub struct Fleet {
    aliens: Vec<Alien>,
    image: Rc<Image>,
    screen: Rect,
}

impl Fleet {
    pub fn new(image: Rc<Image>, screen: Rect) -> Self {
        Self {
            aliens: Vec::new(),
            image,
            screen,
        }
    }

    pub fn layout(&self, ship_h: i32) -> FleetLayout {
        FleetLayout::compute(
            self.image.width(),
            self.image.height(),
            ship_h,
            self.screen.w,
            self.screen.h,
        )
    }

    /// Replace the fleet with a full grid
    pub fn create(&mut self, ship_h: i32) {
        self.aliens.clear();
        let layout = self.layout(ship_h);
        self.aliens.reserve(layout.len());
        for (x, y) in layout.positions() {
            self.spawn_at(x, y);
        }
        log::debug!("Fleet created: {} aliens", self.len());
    }

    pub fn spawn_at(&mut self, x: i32, y: i32) {
        self.aliens.push(Alien::new(Rc::clone(&self.image), x, y));
    }

    pub fn clear(&mut self) {
        self.aliens.clear();
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alien> {
        self.aliens.iter()
    }

    /// Drop and reverse the fleet if any alien touches a side edge.
    /// Happens at most once per call.
    pub fn check_edges(&mut self, dynamic: &mut DynamicSettings, drop_speed: i32) -> bool {
        if !self.aliens.iter().any(|a| a.at_edge(&self.screen)) {
            return false;
        }
        for alien in &mut self.aliens {
            alien.drop_by(drop_speed);
        }
        dynamic.fleet_direction = dynamic.fleet_direction.reversed();
        true
    }

    pub fn update(&mut self, dynamic: &DynamicSettings) {
        for alien in &mut self.aliens {
            alien.update(dynamic);
        }
    }

    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.aliens.iter().any(|a| a.rect().intersects(rect))
    }

    pub fn any_reached_bottom(&self) -> bool {
        self.aliens
            .iter()
            .any(|a| a.rect().bottom() >= self.screen.bottom())
    }

    /// Remove the aliens at the given indices
    pub fn remove(&mut self, hit: &[usize]) {
        let mut index = 0;
        self.aliens.retain(|_| {
            let keep = !hit.contains(&index);
            index += 1;
            keep
        });
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for alien in &self.aliens {
            alien.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FleetDirection, Rgb};
    use proptest::prelude::*;

    const SCREEN: Rect = Rect::new(0, 0, 1200, 800);

    fn alien_image() -> Rc<Image> {
        // 60x50 px
        let art = vec!["#".repeat(12); 10].join("\n");
        Rc::new(Image::parse(&art, 5, Rgb(0, 0, 0)).unwrap())
    }

    #[test]
    fn layout_matches_grid_formula() {
        let layout = FleetLayout::compute(60, 50, 45, 1200, 800);
        assert_eq!(layout.columns, 9);
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.len(), 54);

        let positions: Vec<_> = layout.positions().collect();
        assert_eq!(positions[0], (60, 50));
        assert_eq!(positions[1], (180, 50));
        assert_eq!(positions[9], (60, 150));
        assert_eq!(*positions.last().unwrap(), (1020, 550));
    }

    #[test]
    fn layout_never_goes_negative() {
        let layout = FleetLayout::compute(60, 50, 45, 100, 100);
        assert_eq!(layout.len(), 0);
        assert_eq!(layout.positions().count(), 0);
    }

    #[test]
    fn create_fills_the_grid() {
        let mut fleet = Fleet::new(alien_image(), SCREEN);
        fleet.create(45);
        assert_eq!(fleet.len(), 54);
        fleet.create(45);
        assert_eq!(fleet.len(), 54, "create replaces instead of appending");
    }

    #[test]
    fn many_aliens_at_edge_drop_once() {
        let mut fleet = Fleet::new(alien_image(), SCREEN);
        fleet.spawn_at(0, 50);
        fleet.spawn_at(0, 150);
        fleet.spawn_at(1140, 250);
        fleet.spawn_at(500, 350);
        let mut dynamic = DynamicSettings::default();

        assert!(fleet.check_edges(&mut dynamic, 10));
        assert_eq!(dynamic.fleet_direction, FleetDirection::Left);
        let ys: Vec<i32> = fleet.iter().map(|a| a.rect().y).collect();
        assert_eq!(ys, vec![60, 160, 260, 360]);
    }

    #[test]
    fn no_edge_no_drop() {
        let mut fleet = Fleet::new(alien_image(), SCREEN);
        fleet.spawn_at(500, 50);
        let mut dynamic = DynamicSettings::default();
        assert!(!fleet.check_edges(&mut dynamic, 10));
        assert_eq!(dynamic.fleet_direction, FleetDirection::Right);
        assert_eq!(fleet.iter().next().unwrap().rect().y, 50);
    }

    #[test]
    fn bottom_and_ship_contact() {
        let mut fleet = Fleet::new(alien_image(), SCREEN);
        fleet.spawn_at(500, 700);
        assert!(!fleet.any_reached_bottom());
        assert!(fleet.collides_with(&Rect::new(540, 740, 60, 45)));
        assert!(!fleet.collides_with(&Rect::new(560, 750, 60, 45)));

        fleet.spawn_at(100, 750);
        assert!(fleet.any_reached_bottom());
    }

    #[test]
    fn remove_drops_indexed_aliens() {
        let mut fleet = Fleet::new(alien_image(), SCREEN);
        for i in 0..5 {
            fleet.spawn_at(100 * i + 60, 50);
        }
        fleet.remove(&[1, 3]);
        let xs: Vec<i32> = fleet.iter().map(|a| a.rect().x).collect();
        assert_eq!(xs, vec![60, 260, 460]);
    }

    proptest! {
        #[test]
        fn layout_is_deterministic_and_on_screen(
            alien_w in 1i32..200,
            alien_h in 1i32..200,
            ship_h in 1i32..200,
            screen_w in 1i32..4000,
            screen_h in 1i32..4000,
        ) {
            let a = FleetLayout::compute(alien_w, alien_h, ship_h, screen_w, screen_h);
            let b = FleetLayout::compute(alien_w, alien_h, ship_h, screen_w, screen_h);
            prop_assert_eq!(a, b);
            prop_assert_eq!(
                a.positions().collect::<Vec<_>>(),
                b.positions().collect::<Vec<_>>()
            );
            prop_assert_eq!(a.positions().count(), a.len());
            for (x, y) in a.positions() {
                prop_assert!(x + alien_w <= screen_w - alien_w);
                prop_assert!(y + alien_h <= screen_h - ship_h);
            }
        }
    }
}
