//! Level builder: turns a character grid into typed static geometry and
//! dynamic entity seeds.
//!
//! Gameplay truth lives in the built `Level`; the row strings are only read
//! here. Entity lists are plain `Vec`s whose indices serve as stable ids for the
//! lifetime of one level instance. Rebuilding from the same rows yields a fresh
//! instance with every entity active again.

use glam::Vec2;

use crate::collision::{first_overlap, Aabb, Rect};
use crate::config::GameConfig;
use crate::levels::LevelTable;

const GOAL_MARKER: char = 'F';

/// A coin or power-up: a trigger box that deactivates once on pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub rect: Rect,
    pub active: bool,
}

impl Pickup {
    fn new(rect: Rect) -> Self {
        Self { rect, active: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub active: bool,
    /// -1 walking left, +1 walking right.
    pub direction: i32,
    pub speed: f32,
}

impl Enemy {
    fn new(rect: Rect, speed: f32) -> Self {
        Self {
            rect,
            active: true,
            direction: -1,
            speed,
        }
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    pub solids: Vec<Rect>,
    pub coins: Vec<Pickup>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<Pickup>,
    pub goal: Option<Rect>,
    pub world_width: i32,
}

impl Level {
    /// Build a level from its rows. Unknown characters are empty space. Rows
    /// are expected to have passed `validate_level_rows`; if several goal
    /// markers slip through anyway, the last one is kept.
    pub fn build(rows: &[&str], config: &GameConfig) -> Self {
        let tile = config.viewport.tile;
        let enemy = &config.enemy;
        let layout = &config.layout;

        let mut level = Level {
            solids: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            goal: None,
            world_width: 0,
        };

        for (row_index, row) in rows.iter().enumerate() {
            let y = row_index as i32 * tile;
            for (column, ch) in row.chars().enumerate() {
                let x = column as i32 * tile;
                match ch {
                    'X' | '=' => level.solids.push(Rect::new(x, y, tile, tile)),
                    't' => level
                        .solids
                        .push(Rect::new(x, y + tile / 2, tile, tile / 2)),
                    'C' => level.coins.push(Pickup::new(Rect::new(
                        x + tile / 4,
                        y + tile / 4,
                        tile / 2,
                        tile / 2,
                    ))),
                    'E' => level.enemies.push(Enemy::new(
                        Rect::new(
                            x + enemy.inset_x,
                            y + enemy.inset_top,
                            tile - enemy.inset_x * 2,
                            tile - enemy.inset_top - enemy.inset_bottom,
                        ),
                        enemy.speed,
                    )),
                    'M' => level.power_ups.push(Pickup::new(Rect::new(
                        x + layout.power_up_inset,
                        y + layout.power_up_inset,
                        tile - layout.power_up_inset * 2,
                        tile - layout.power_up_inset * 2,
                    ))),
                    GOAL_MARKER => {
                        let height = layout.goal_height_tiles * tile;
                        level.goal = Some(Rect::new(
                            x + tile / 2 - layout.goal_width / 2,
                            y - height,
                            layout.goal_width,
                            height,
                        ));
                    }
                    _ => {}
                }
            }
        }
        // The first row sets the scrollable width; longer rows run off-camera.
        let columns = rows.first().map_or(0, |row| row.chars().count());
        level.world_width = columns as i32 * tile;

        log::debug!(
            "Built level: {} solids, {} coins, {} enemies, {} power-ups, goal: {}",
            level.solids.len(),
            level.coins.len(),
            level.enemies.len(),
            level.power_ups.len(),
            level.goal.is_some()
        );
        level
    }

    /// Drop an actor of `size` from `start` with steadily growing speed until it
    /// lands on a solid, and return the resting position. `None` when nothing
    /// is hit within `max_iterations`.
    pub fn find_spawn(&self, start: Vec2, size: Vec2, max_iterations: u32) -> Option<Vec2> {
        let mut position = start;
        let mut fall_speed = 0.0;
        for _ in 0..max_iterations {
            fall_speed += 1.0;
            position.y += fall_speed;
            let probe = Aabb::new(position.x, position.y, size.x, size.y).to_rect();
            if let Some(solid) = first_overlap(&self.solids, &probe) {
                position.y = solid.y as f32 - size.y;
                return Some(position);
            }
        }
        None
    }

    pub fn active_coins(&self) -> impl Iterator<Item = &Pickup> {
        self.coins.iter().filter(|coin| coin.active)
    }

    pub fn active_power_ups(&self) -> impl Iterator<Item = &Pickup> {
        self.power_ups.iter().filter(|power_up| power_up.active)
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.active)
    }
}

pub fn validate_level_rows(rows: &[&str]) -> Result<(), String> {
    if rows.is_empty() {
        return Err("Level validation failed: no rows".to_string());
    }

    let mut goal: Option<(usize, usize)> = None;
    for (row_index, row) in rows.iter().enumerate() {
        for (column, ch) in row.chars().enumerate() {
            if ch != GOAL_MARKER {
                continue;
            }
            if let Some((first_row, first_column)) = goal {
                return Err(format!(
                    "Level validation failed: duplicate goal marker at row {row_index}, column {column} (first at row {first_row}, column {first_column})"
                ));
            }
            goal = Some((row_index, column));
        }
    }
    Ok(())
}

pub fn validate_levels(levels: LevelTable) -> Result<(), String> {
    if levels.is_empty() {
        return Err("Level validation failed: level table is empty".to_string());
    }
    for (index, rows) in levels.iter().enumerate() {
        validate_level_rows(rows).map_err(|e| format!("Level {}: {e}", index + 1))?;
    }
    Ok(())
}
