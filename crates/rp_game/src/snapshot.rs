//! Read-only view of one tick for whatever draws the game.
//!
//! The snapshot copies out only what is visible: active entities, the player's
//! whole-pixel rectangle and skin, a horizontally clamped camera and the HUD.

use std::fmt;

use crate::collision::{Aabb, Rect};
use crate::game::{Game, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSkin {
    Normal,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// One-based.
    pub level_number: usize,
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    /// Seconds remaining, never negative.
    pub time_left: u32,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LEVEL {}    SCORE {:06}    COINS {:02}    LIVES {}    TIME {:03}",
            self.level_number, self.score, self.coins, self.lives, self.time_left
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub state: GameState,
    pub camera_x: i32,
    pub solids: Vec<Rect>,
    pub coins: Vec<Rect>,
    pub enemies: Vec<Rect>,
    pub power_ups: Vec<Rect>,
    pub goal: Option<Rect>,
    pub player: Rect,
    pub skin: PlayerSkin,
    pub hud: Hud,
}

impl FrameSnapshot {
    pub fn capture(game: &Game, now_ms: u64) -> Self {
        let level = game.level();
        let player = game.player();
        let viewport_width = game.config().viewport.width;

        Self {
            state: game.state(),
            camera_x: camera_offset(&player.aabb, level.world_width, viewport_width),
            solids: level.solids.clone(),
            coins: level.active_coins().map(|coin| coin.rect).collect(),
            enemies: level.active_enemies().map(|enemy| enemy.rect).collect(),
            power_ups: level.active_power_ups().map(|power_up| power_up.rect).collect(),
            goal: level.goal,
            player: player.hitbox(),
            skin: if player.big {
                PlayerSkin::Big
            } else {
                PlayerSkin::Normal
            },
            hud: Hud {
                level_number: game.level_index() + 1,
                score: player.score,
                coins: player.coins,
                lives: player.lives,
                time_left: game.time_left(now_ms).clamp(0, i64::from(u32::MAX)) as u32,
            },
        }
    }
}

/// Horizontal camera offset that centres the player, kept inside the world.
pub fn camera_offset(player: &Aabb, world_width: i32, viewport_width: i32) -> i32 {
    let max_offset = (world_width - viewport_width).max(0);
    (player.center_x() as i32 - viewport_width / 2).clamp(0, max_offset)
}
