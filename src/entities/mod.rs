pub mod alien;
pub mod projectile;
pub mod ship;

pub use alien::Alien;
pub use projectile::Projectile;
pub use ship::Ship;

use crate::geometry::Rect;
use crate::platform::Surface;
use crate::settings::DynamicSettings;

pub trait Entity {
    fn rect(&self) -> Rect;
    fn update(&mut self, dynamic: &DynamicSettings);
    fn draw(&self, surface: &mut dyn Surface);
}
