//! Game settings
//!
//! Static configuration is loaded once at startup (optionally from a JSON
//! override file). The `dynamic` block is reset at the start of every game
//! and scaled up on every level.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// 24-bit color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Horizontal heading of the whole fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FleetDirection {
    #[default]
    Right,
    Left,
}

impl FleetDirection {
    pub fn sign(&self) -> f32 {
        match self {
            FleetDirection::Right => 1.0,
            FleetDirection::Left => -1.0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            FleetDirection::Right => FleetDirection::Left,
            FleetDirection::Left => FleetDirection::Right,
        }
    }
}

/// Values that change during play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicSettings {
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub fleet_direction: FleetDirection,
    pub alien_points: u32,
}

impl Default for DynamicSettings {
    fn default() -> Self {
        Self {
            ship_speed: 1.5,
            bullet_speed: 3.0,
            alien_speed: 1.0,
            fleet_direction: FleetDirection::Right,
            alien_points: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: i32,
    pub screen_height: i32,
    pub bg_color: Rgb,

    // === Ship ===
    pub ship_limit: u32,
    pub ship_color: Rgb,

    // === Bullets ===
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    // === Aliens ===
    pub fleet_drop_speed: i32,
    pub alien_color: Rgb,

    // === Progression ===
    pub speedup_scale: f32,
    pub score_scale: f32,

    // === Presentation ===
    pub text_color: Rgb,
    /// Logical pixels per character of sprite art
    pub sprite_scale: u32,
    /// Tick period
    pub frame_ms: u64,
    /// Blocking pause after losing a ship
    pub ship_hit_pause_ms: u64,

    /// Starting values for the dynamic block
    #[serde(rename = "dynamic")]
    pub base: DynamicSettings,

    /// Live values, reset from `base`
    #[serde(skip)]
    pub dynamic: DynamicSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let base = DynamicSettings::default();
        Self {
            screen_width: 1200,
            screen_height: 800,
            bg_color: Rgb(230, 230, 230),

            ship_limit: 3,
            ship_color: Rgb(40, 90, 200),

            bullet_width: 3,
            bullet_height: 15,
            bullet_color: Rgb(60, 60, 60),
            bullets_allowed: 3,

            fleet_drop_speed: 10,
            alien_color: Rgb(40, 150, 40),

            speedup_scale: 1.1,
            score_scale: 1.5,

            text_color: Rgb(30, 30, 30),
            sprite_scale: 5,
            frame_ms: 16,
            ship_hit_pause_ms: 500,

            dynamic: base.clone(),
            base,
        }
    }
}

impl Settings {
    /// Load settings, applying overrides from a JSON file when one is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        settings.initialize_dynamic_settings();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn initialize_dynamic_settings(&mut self) {
        self.dynamic = self.base.clone();
    }

    pub fn increase_speed(&mut self) {
        self.dynamic.ship_speed *= self.speedup_scale;
        self.dynamic.bullet_speed *= self.speedup_scale;
        self.dynamic.alien_speed *= self.speedup_scale;

        self.dynamic.alien_points = (self.dynamic.alien_points as f32 * self.score_scale) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_speed_scales_dynamic_values() {
        let mut settings = Settings::default();
        settings.increase_speed();

        let d = &settings.dynamic;
        assert!((d.ship_speed - 1.65).abs() < 1e-5);
        assert!((d.bullet_speed - 3.3).abs() < 1e-5);
        assert!((d.alien_speed - 1.1).abs() < 1e-5);
        assert_eq!(d.alien_points, 75);

        settings.increase_speed();
        assert_eq!(settings.dynamic.alien_points, 112);
    }

    #[test]
    fn initialize_restores_base_values() {
        let mut settings = Settings::default();
        settings.increase_speed();
        settings.dynamic.fleet_direction = FleetDirection::Left;

        settings.initialize_dynamic_settings();
        assert_eq!(settings.dynamic, settings.base);
        assert_eq!(settings.dynamic.fleet_direction, FleetDirection::Right);
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let json = r#"{
            "screen_width": 800,
            "bullets_allowed": 5,
            "dynamic": { "alien_points": 10 }
        }"#;
        let mut settings: Settings = serde_json::from_str(json).unwrap();
        settings.initialize_dynamic_settings();

        assert_eq!(settings.screen_width, 800);
        assert_eq!(settings.screen_height, 800);
        assert_eq!(settings.bullets_allowed, 5);
        assert_eq!(settings.dynamic.alien_points, 10);
        assert_eq!(settings.dynamic.ship_speed, 1.5);
        assert_eq!(settings.bg_color, Rgb(230, 230, 230));
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let path = Path::new("/nonexistent/alien-invasion.json");
        let err = Settings::load(Some(path)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("/nonexistent/alien-invasion.json"));
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(FleetDirection::Right.reversed(), FleetDirection::Left);
        assert_eq!(FleetDirection::Left.sign(), -1.0);
    }
}
