//! Game engine
//!
//! Owns every entity and drives one simulation step per tick:
//! ship → projectiles (+ collisions) → fleet (+ ship/bottom checks).
//! Rendering is separate and runs every loop iteration, Active or not.

use std::time::Duration;

use crate::assets::Assets;
use crate::button::Button;
use crate::entities::{Entity, Projectile, Ship};
use crate::fleet::Fleet;
use crate::geometry::Rect;
use crate::platform::{InputEvent, Key, Platform, Surface, TextRenderer};
use crate::scoreboard::Scoreboard;
use crate::settings::Settings;
use crate::stats::GameStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting on the Play button
    Idle,
    Active,
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct AlienInvasion {
    settings: Settings,
    screen: Rect,
    stats: GameStats,
    scoreboard: Scoreboard,
    ship: Ship,
    bullets: Vec<Projectile>,
    fleet: Fleet,
    play_button: Button,
    state: GameState,
}

impl AlienInvasion {
    pub fn new(settings: Settings, assets: &Assets, text: &dyn TextRenderer) -> Self {
        let screen = Rect::new(0, 0, settings.screen_width, settings.screen_height);
        let stats = GameStats::new(settings.ship_limit);
        let scoreboard = Scoreboard::new(&settings, screen, assets.ship.clone(), &stats, text);
        let ship = Ship::new(assets.ship.clone(), screen);
        let mut fleet = Fleet::new(assets.alien.clone(), screen);
        fleet.create(ship.rect().h);
        let play_button = Button::new(screen, "Play", text);

        Self {
            settings,
            screen,
            stats,
            scoreboard,
            ship,
            bullets: Vec::new(),
            fleet,
            play_button,
            state: GameState::Idle,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.settings.frame_ms)
    }

    pub fn handle_event(&mut self, event: InputEvent, platform: &mut dyn Platform) -> Control {
        match event {
            InputEvent::Quit => return Control::Quit,
            InputEvent::KeyDown(key) => return self.check_keydown(key, platform),
            InputEvent::KeyUp(key) => self.check_keyup(key),
            InputEvent::PointerDown { x, y } => self.check_play_button(x, y, platform),
        }
        Control::Continue
    }

    fn check_keydown(&mut self, key: Key, platform: &mut dyn Platform) -> Control {
        match key {
            Key::Right => self.ship.moving_right = true,
            Key::Left => self.ship.moving_left = true,
            Key::Fire => self.fire_bullet(),
            Key::Play => {
                if self.state == GameState::Idle {
                    self.start_game(platform);
                }
            }
            Key::Quit => return Control::Quit,
        }
        Control::Continue
    }

    fn check_keyup(&mut self, key: Key) {
        match key {
            Key::Right => self.ship.moving_right = false,
            Key::Left => self.ship.moving_left = false,
            _ => {}
        }
    }

    fn check_play_button(&mut self, x: i32, y: i32, platform: &mut dyn Platform) {
        if self.play_button.contains(x, y) && self.state == GameState::Idle {
            self.start_game(platform);
        }
    }

    pub fn start_game(&mut self, platform: &mut dyn Platform) {
        self.settings.initialize_dynamic_settings();

        self.stats.reset(self.settings.ship_limit);
        self.state = GameState::Active;
        self.scoreboard.prep_score(&self.stats, &*platform);
        self.scoreboard.prep_level(&self.stats, &*platform);
        self.scoreboard.prep_ships(&self.stats);

        self.fleet.clear();
        self.bullets.clear();

        self.fleet.create(self.ship.rect().h);
        self.ship.center();

        platform.set_pointer_visible(false);
        log::info!("Game started");
    }

    fn fire_bullet(&mut self) {
        if self.state != GameState::Active {
            return;
        }
        if self.bullets.len() < self.settings.bullets_allowed {
            self.bullets
                .push(Projectile::new(&self.settings, self.ship.rect().mid_top()));
        }
    }

    /// Advance the simulation by one tick. No-op while Idle.
    pub fn update(&mut self, platform: &mut dyn Platform) {
        if self.state != GameState::Active {
            return;
        }
        self.ship.update(&self.settings.dynamic);
        self.update_bullets(platform);
        self.update_aliens(platform);
    }

    fn update_bullets(&mut self, platform: &mut dyn Platform) {
        for bullet in &mut self.bullets {
            bullet.update(&self.settings.dynamic);
        }
        self.bullets.retain(|b| !b.is_spent());

        self.check_bullet_alien_collisions(platform);
    }

    fn check_bullet_alien_collisions(&mut self, platform: &mut dyn Platform) {
        let (spent, killed) = find_hits(&self.bullets, &self.fleet);

        if !killed.is_empty() {
            let mut index = 0;
            self.bullets.retain(|_| {
                let keep = !spent.contains(&index);
                index += 1;
                keep
            });
            self.fleet.remove(&killed);

            self.stats
                .record_kills(killed.len(), self.settings.dynamic.alien_points);
            self.scoreboard.prep_score(&self.stats, &*platform);
            self.scoreboard.check_high_score(&mut self.stats, &*platform);
        }

        if self.fleet.is_empty() {
            self.bullets.clear();
            self.fleet.create(self.ship.rect().h);
            self.settings.increase_speed();

            self.stats.level += 1;
            self.scoreboard.prep_level(&self.stats, &*platform);
            log::info!(
                "Fleet cleared, level {} (alien points {})",
                self.stats.level,
                self.settings.dynamic.alien_points
            );
        }
    }

    fn update_aliens(&mut self, platform: &mut dyn Platform) {
        self.fleet
            .check_edges(&mut self.settings.dynamic, self.settings.fleet_drop_speed);
        self.fleet.update(&self.settings.dynamic);

        if self.fleet.collides_with(&self.ship.rect()) {
            log::debug!("Ship hit by alien");
            self.ship_hit(platform);
            return;
        }

        if self.fleet.any_reached_bottom() {
            log::debug!("Alien reached the bottom");
            self.ship_hit(platform);
        }
    }

    fn ship_hit(&mut self, platform: &mut dyn Platform) {
        if self.stats.ships_left > 1 {
            self.stats.ships_left -= 1;
            self.scoreboard.prep_ships(&self.stats);

            self.fleet.clear();
            self.bullets.clear();

            self.fleet.create(self.ship.rect().h);
            self.ship.center();

            log::debug!("Ship lost, {} left", self.stats.ships_left);
            platform.pause(Duration::from_millis(self.settings.ship_hit_pause_ms));
        } else {
            self.stats.ships_left = 0;
            self.scoreboard.prep_ships(&self.stats);
            self.state = GameState::Idle;
            platform.set_pointer_visible(true);
            log::info!(
                "Game over at level {} with score {} (high {})",
                self.stats.level,
                self.stats.score,
                self.stats.high_score
            );
        }
    }

    /// Re-render all text after the text metrics changed (terminal resize)
    pub fn refresh_display(&mut self, text: &dyn TextRenderer) {
        self.scoreboard.prep_all(&self.stats, text);
        self.play_button.refresh(text);
    }

    /// Draw one frame. A surface whose size differs from the screen is
    /// left untouched.
    pub fn render(&self, surface: &mut dyn Surface) {
        if surface.size() != (self.screen.w, self.screen.h) {
            log::debug!("Skipping frame for a {:?} surface", surface.size());
            return;
        }
        surface.fill(self.settings.bg_color);
        self.ship.draw(surface);
        for bullet in &self.bullets {
            bullet.draw(surface);
        }
        self.fleet.draw(surface);

        self.scoreboard.show(surface);

        if self.state == GameState::Idle {
            self.play_button.draw(surface);
        }

        surface.present();
    }
}

/// Pair projectiles with aliens. Each projectile takes at most one alien and
/// each alien is taken at most once. Returns (projectile, alien) indices.
fn find_hits(bullets: &[Projectile], fleet: &Fleet) -> (Vec<usize>, Vec<usize>) {
    let mut spent = Vec::new();
    let mut killed: Vec<usize> = Vec::new();
    for (bi, bullet) in bullets.iter().enumerate() {
        let rect = bullet.rect();
        let hit = fleet
            .iter()
            .enumerate()
            .filter(|(ai, _)| !killed.contains(ai))
            .find(|(_, alien)| alien.rect().intersects(&rect));
        if let Some((ai, _)) = hit {
            spent.push(bi);
            killed.push(ai);
        }
    }
    (spent, killed)
}
