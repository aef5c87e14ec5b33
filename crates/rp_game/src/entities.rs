//! Per-tick entity updaters: enemy patrol, pickups, player-vs-enemy combat and
//! big-mode depletion.
//!
//! Each updater walks its list in id order and reports what happened as
//! `GameEvent`s. State transitions (level clear, game over) are left to the
//! caller; combat only says whether the player ran out of lives.

use crate::collision::{overlaps_any, Rect};
use crate::config::{GameConfig, LedgeSensorConfig};
use crate::game::{GameEvent, LifeLostCause};
use crate::level::{Enemy, Level};
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Continue,
    LivesExhausted,
}

/// Advance every active enemy one step and turn it around at walls and ledges.
///
/// The wall check runs first and reverts the step; the ledge check then probes
/// ahead in the (possibly new) walking direction. Both can fire in one tick.
pub fn update_enemies(enemies: &mut [Enemy], solids: &[Rect], sensor: &LedgeSensorConfig) {
    for enemy in enemies.iter_mut().filter(|enemy| enemy.active) {
        let old_x = enemy.rect.x;
        enemy.rect.x += (enemy.direction as f32 * enemy.speed).round() as i32;
        if overlaps_any(solids, &enemy.rect) {
            enemy.rect.x = old_x;
            enemy.reverse();
        }

        if !overlaps_any(solids, &ledge_probe(enemy, sensor)) {
            enemy.reverse();
        }
    }
}

fn ledge_probe(enemy: &Enemy, sensor: &LedgeSensorConfig) -> Rect {
    let x = if enemy.direction > 0 {
        enemy.rect.right() + sensor.ahead
    } else {
        enemy.rect.x - sensor.behind
    };
    Rect::new(x, enemy.rect.bottom() + sensor.drop, sensor.size, sensor.size)
}

/// Collect every active coin and power-up overlapping the player.
pub fn collect_pickups(
    player: &mut Player,
    level: &mut Level,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let scoring = &config.scoring;

    for (id, coin) in level.coins.iter_mut().enumerate() {
        if !coin.active || !player.hitbox().overlaps(&coin.rect) {
            continue;
        }
        coin.active = false;
        player.coins += 1;
        player.score += scoring.coin;
        events.push(GameEvent::CoinCollected { coin: id });
    }

    for (id, power_up) in level.power_ups.iter_mut().enumerate() {
        if !power_up.active || !player.hitbox().overlaps(&power_up.rect) {
            continue;
        }
        power_up.active = false;
        let grew = !player.big;
        if grew {
            player.grow(config.viewport.half_tile(), config.rules.big_mode_seconds);
            player.score += scoring.power_up;
        } else {
            player.score += scoring.power_up_when_big;
        }
        events.push(GameEvent::PowerUpCollected {
            power_up: id,
            grew,
        });
    }
}

/// Resolve contact with every active enemy overlapping the player: a stomp
/// when falling onto its top, otherwise a hit. Stops at the first hit that
/// spends the last life.
pub fn resolve_combat(
    player: &mut Player,
    enemies: &mut [Enemy],
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> CombatOutcome {
    let enemy_config = &config.enemy;

    for (id, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.active || !player.hitbox().overlaps(&enemy.rect) {
            continue;
        }

        let feet_gap = player.aabb.bottom() - enemy.rect.y as f32;
        if player.velocity.y > 0.0 && feet_gap < enemy_config.stomp_threshold {
            enemy.active = false;
            player.velocity.y = config.physics.jump_velocity * enemy_config.stomp_bounce_scale;
            player.score += config.scoring.stomp;
            events.push(GameEvent::EnemyStomped { enemy: id });
        } else if player.big {
            player.shrink(config.viewport.half_tile());
            events.push(GameEvent::ShrankFromHit { enemy: id });
        } else {
            let exhausted = player.lose_life();
            events.push(GameEvent::LifeLost {
                cause: LifeLostCause::Enemy,
                lives_left: player.lives,
            });
            if exhausted {
                return CombatOutcome::LivesExhausted;
            }
        }
    }
    CombatOutcome::Continue
}

/// Count big mode down by `dt` seconds and shrink back when it runs out.
pub fn deplete_big_mode(player: &mut Player, dt: f32, shrink_by: f32, events: &mut Vec<GameEvent>) {
    if !player.big {
        return;
    }
    player.big_timer -= dt;
    if player.big_timer <= 0.0 {
        player.shrink(shrink_by);
        events.push(GameEvent::BigModeExpired);
    }
}
