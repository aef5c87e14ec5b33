//! Tunable gameplay constants.
//!
//! Every field defaults to the values the game ships with, and a JSON file may
//! override any subset of them (missing sections and fields fall back to the
//! defaults). Velocities are in pixels per tick, +y points down.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: ViewportConfig,
    pub physics: PhysicsConfig,
    pub enemy: EnemyConfig,
    pub layout: LayoutConfig,
    pub scoring: ScoringConfig,
    pub rules: RulesConfig,
    pub spawn: SpawnConfig,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ViewportConfig {
    pub tile: i32,
    pub width: i32,
    pub height: i32,
    pub fps: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            tile: 48,
            width: 960,
            height: 540,
            fps: 60,
        }
    }
}

impl ViewportConfig {
    /// Height gained (and lost again) by the player when big mode toggles.
    pub fn half_tile(&self) -> f32 {
        (self.tile / 2) as f32
    }

    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub run_accel: f32,
    pub max_run_speed: f32,
    pub jump_velocity: f32,
    pub big_jump_scale: f32,
    pub ground_friction: f32,
    /// Friction only applies above this horizontal speed.
    pub friction_threshold: f32,
    /// Horizontal speed below this snaps to zero after friction.
    pub friction_cutoff: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            max_fall_speed: 20.0,
            run_accel: 0.9,
            max_run_speed: 6.0,
            jump_velocity: -12.0,
            big_jump_scale: 0.95,
            ground_friction: 0.82,
            friction_threshold: 0.01,
            friction_cutoff: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct EnemyConfig {
    pub speed: f32,
    pub inset_x: i32,
    pub inset_top: i32,
    pub inset_bottom: i32,
    pub ledge_sensor: LedgeSensorConfig,
    /// Max distance between the player's feet and the enemy's top that still
    /// counts as a stomp.
    pub stomp_threshold: f32,
    pub stomp_bounce_scale: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: 1.2,
            inset_x: 6,
            inset_top: 8,
            inset_bottom: 8,
            ledge_sensor: LedgeSensorConfig::default(),
            stomp_threshold: 16.0,
            stomp_bounce_scale: 0.6,
        }
    }
}

/// Probe placed just beyond an enemy's leading edge, below its feet.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LedgeSensorConfig {
    pub size: i32,
    /// Gap past the right edge when walking right.
    pub ahead: i32,
    /// Offset left of the left edge when walking left.
    pub behind: i32,
    pub drop: i32,
}

impl Default for LedgeSensorConfig {
    fn default() -> Self {
        Self {
            size: 2,
            ahead: 2,
            behind: 4,
            drop: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LayoutConfig {
    pub power_up_inset: i32,
    pub goal_width: i32,
    pub goal_height_tiles: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            power_up_inset: 12,
            goal_width: 12,
            goal_height_tiles: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ScoringConfig {
    pub coin: u32,
    pub power_up: u32,
    pub power_up_when_big: u32,
    pub stomp: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coin: 100,
            power_up: 500,
            power_up_when_big: 200,
            stomp: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct RulesConfig {
    pub starting_lives: u32,
    pub level_seconds: u32,
    pub big_mode_seconds: f32,
    /// How far below the viewport the player may fall before losing a life.
    pub fall_margin: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            level_seconds: 300,
            big_mode_seconds: 12.0,
            fall_margin: 200.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SpawnConfig {
    pub x: f32,
    pub y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub max_drop_iterations: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: 60.0,
            y: 0.0,
            player_width: 36.0,
            player_height: 40.0,
            max_drop_iterations: 2000,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let viewport = &config.viewport;
    if viewport.tile <= 0 {
        return Err("Config validation failed: viewport.tile must be > 0".to_string());
    }
    if viewport.width <= 0 || viewport.height <= 0 {
        return Err(
            "Config validation failed: viewport width and height must be > 0".to_string(),
        );
    }
    if viewport.fps == 0 {
        return Err("Config validation failed: viewport.fps must be > 0".to_string());
    }
    if config.enemy.ledge_sensor.size <= 0 {
        return Err("Config validation failed: enemy.ledge_sensor.size must be > 0".to_string());
    }
    if config.enemy.inset_x * 2 >= viewport.tile
        || config.enemy.inset_top + config.enemy.inset_bottom >= viewport.tile
    {
        return Err("Config validation failed: enemy insets leave no hitbox".to_string());
    }
    if config.layout.power_up_inset * 2 >= viewport.tile {
        return Err("Config validation failed: power_up_inset leaves no hitbox".to_string());
    }
    if config.layout.goal_width <= 0 || config.layout.goal_height_tiles <= 0 {
        return Err("Config validation failed: goal dimensions must be > 0".to_string());
    }
    if config.rules.starting_lives == 0 {
        return Err("Config validation failed: rules.starting_lives must be > 0".to_string());
    }
    if config.rules.level_seconds == 0 {
        return Err("Config validation failed: rules.level_seconds must be > 0".to_string());
    }
    if config.rules.big_mode_seconds <= 0.0 {
        return Err("Config validation failed: rules.big_mode_seconds must be > 0".to_string());
    }
    if config.spawn.player_width <= 0.0 || config.spawn.player_height <= 0.0 {
        return Err("Config validation failed: player size must be > 0".to_string());
    }
    Ok(())
}
