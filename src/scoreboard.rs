//! Score, high score, level and remaining-ship display.
//!
//! Everything here is derived from `GameStats`; the `prep_*` methods must be
//! called whenever the matching stat changes.

use std::rc::Rc;

use crate::assets::Image;
use crate::geometry::Rect;
use crate::platform::{Surface, TextImage, TextRenderer};
use crate::settings::{Rgb, Settings};
use crate::stats::GameStats;

const MARGIN: i32 = 20;
const LEVEL_GAP: i32 = 10;
const SHIP_ICON_ORIGIN: (i32, i32) = (10, 10);

/// Round down to a multiple of ten and add thousands separators
pub fn format_score(score: u32) -> String {
    let rounded = score / 10 * 10;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub struct Scoreboard {
    screen: Rect,
    text_color: Rgb,
    bg_color: Rgb,
    ship_image: Rc<Image>,
    score_image: TextImage,
    high_score_image: TextImage,
    level_image: TextImage,
    ships: Vec<Rect>,
}

impl Scoreboard {
    pub fn new<T: TextRenderer + ?Sized>(
        settings: &Settings,
        screen: Rect,
        ship_image: Rc<Image>,
        stats: &GameStats,
        text: &T,
    ) -> Self {
        let blank = text.render_text("", settings.text_color, settings.bg_color);
        let mut sb = Self {
            screen,
            text_color: settings.text_color,
            bg_color: settings.bg_color,
            ship_image,
            score_image: blank.clone(),
            high_score_image: blank.clone(),
            level_image: blank,
            ships: Vec::new(),
        };
        sb.prep_all(stats, text);
        sb
    }

    pub fn prep_all<T: TextRenderer + ?Sized>(&mut self, stats: &GameStats, text: &T) {
        self.prep_score(stats, text);
        self.prep_high_score(stats, text);
        self.prep_level(stats, text);
        self.prep_ships(stats);
    }

    pub fn prep_score<T: TextRenderer + ?Sized>(&mut self, stats: &GameStats, text: &T) {
        let label = format_score(stats.score);
        let mut image = text.render_text(&label, self.text_color, self.bg_color);
        image.rect.set_right(self.screen.right() - MARGIN);
        image.rect.y = MARGIN;
        self.score_image = image;
    }

    pub fn prep_high_score<T: TextRenderer + ?Sized>(&mut self, stats: &GameStats, text: &T) {
        let label = format_score(stats.high_score);
        let mut image = text.render_text(&label, self.text_color, self.bg_color);
        image.rect.set_center_x(self.screen.center_x());
        image.rect.y = self.score_image.rect.top();
        self.high_score_image = image;
    }

    /// Must run after `prep_score`; the level line hangs below the score.
    pub fn prep_level<T: TextRenderer + ?Sized>(&mut self, stats: &GameStats, text: &T) {
        let label = stats.level.to_string();
        let mut image = text.render_text(&label, self.text_color, self.bg_color);
        image.rect.set_right(self.score_image.rect.right());
        image.rect.y = self.score_image.rect.bottom() + LEVEL_GAP;
        self.level_image = image;
    }

    pub fn prep_ships(&mut self, stats: &GameStats) {
        let (x0, y0) = SHIP_ICON_ORIGIN;
        let w = self.ship_image.width();
        let h = self.ship_image.height();
        self.ships = (0..stats.ships_left as i32)
            .map(|n| Rect::new(x0 + n * w, y0, w, h))
            .collect();
    }

    /// Update the stored high score and its text when it was beaten
    pub fn check_high_score<T: TextRenderer + ?Sized>(&mut self, stats: &mut GameStats, text: &T) {
        if stats.check_high_score() {
            self.prep_high_score(stats, text);
        }
    }

    #[cfg(test)]
    pub fn score_image(&self) -> &TextImage {
        &self.score_image
    }

    #[cfg(test)]
    pub fn high_score_image(&self) -> &TextImage {
        &self.high_score_image
    }

    #[cfg(test)]
    pub fn level_image(&self) -> &TextImage {
        &self.level_image
    }

    #[cfg(test)]
    pub fn ship_icons(&self) -> &[Rect] {
        &self.ships
    }

    pub fn show(&self, surface: &mut dyn Surface) {
        surface.blit_text(&self.score_image);
        surface.blit_text(&self.high_score_image);
        surface.blit_text(&self.level_image);
        for rect in &self.ships {
            surface.blit(&self.ship_image, *rect);
        }
    }
}
