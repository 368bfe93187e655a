//! Sprite images
//!
//! Sprites are stored as text art: a space or `.` is transparent, anything
//! else is an opaque pixel. Each character covers `scale x scale` logical
//! pixels on screen.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context};

use crate::geometry::Rect;
use crate::settings::{Rgb, Settings};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Art resolution (characters)
    cols: usize,
    rows: usize,
    mask: Vec<bool>,
    scale: u32,
    pub tint: Rgb,
}

impl Image {
    pub fn load(path: &Path, scale: u32, tint: Rgb) -> anyhow::Result<Self> {
        let art = fs::read_to_string(path)
            .with_context(|| format!("failed to load image {}", path.display()))?;
        let image = Self::parse(&art, scale, tint)
            .with_context(|| format!("corrupt image {}", path.display()))?;
        log::info!(
            "Loaded {} ({}x{} px)",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    pub fn parse(art: &str, scale: u32, tint: Rgb) -> anyhow::Result<Self> {
        if scale == 0 {
            bail!("sprite scale must be at least 1");
        }
        let lines: Vec<&str> = art.lines().map(str::trim_end).collect();
        // Leading/trailing blank lines are not part of the sprite
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            bail!("image has no pixels");
        };
        let lines = &lines[first..=last];

        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let rows = lines.len();
        let mut mask = vec![false; cols * rows];
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                mask[row * cols + col] = ch != ' ' && ch != '.';
            }
        }
        if !mask.iter().any(|&p| p) {
            bail!("image has no opaque pixels");
        }

        Ok(Self {
            cols,
            rows,
            mask,
            scale,
            tint,
        })
    }

    pub fn width(&self) -> i32 {
        (self.cols as u32 * self.scale) as i32
    }

    pub fn height(&self) -> i32 {
        (self.rows as u32 * self.scale) as i32
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Whether the logical pixel at (`px`, `py`) relative to the image's
    /// top-left corner is opaque.
    pub fn is_opaque(&self, px: i32, py: i32) -> bool {
        if px < 0 || py < 0 {
            return false;
        }
        let col = px as usize / self.scale as usize;
        let row = py as usize / self.scale as usize;
        col < self.cols && row < self.rows && self.mask[row * self.cols + col]
    }
}

/// All sprites the game draws
pub struct Assets {
    pub ship: Rc<Image>,
    pub alien: Rc<Image>,
}

impl Assets {
    pub fn load(dir: &Path, settings: &Settings) -> anyhow::Result<Self> {
        let scale = settings.sprite_scale;
        let ship = Image::load(&dir.join("ship.txt"), scale, settings.ship_color)?;
        let alien = Image::load(&dir.join("alien.txt"), scale, settings.alien_color)?;
        Ok(Self {
            ship: Rc::new(ship),
            alien: Rc::new(alien),
        })
    }
}
