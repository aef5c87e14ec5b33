use glam::Vec2;

use crate::collision::{move_and_collide, Aabb, CollisionMoveResult, Rect};
use crate::config::{GameConfig, PhysicsConfig};
use crate::input::TickInput;

#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub on_ground: bool,
    pub big: bool,
    /// Seconds of big mode left; meaningful only while `big`.
    pub big_timer: f32,
    pub coins: u32,
    pub score: u32,
    pub lives: u32,
    pub spawn: Vec2,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let spawn = Vec2::new(config.spawn.x, config.spawn.y);
        Self {
            aabb: Aabb::new(
                spawn.x,
                spawn.y,
                config.spawn.player_width,
                config.spawn.player_height,
            ),
            velocity: Vec2::ZERO,
            on_ground: false,
            big: false,
            big_timer: 0.0,
            coins: 0,
            score: 0,
            lives: config.rules.starting_lives,
            spawn,
        }
    }

    pub fn reset_progress(&mut self, starting_lives: u32) {
        self.coins = 0;
        self.score = 0;
        self.lives = starting_lives;
    }

    /// Put a normal-size player at rest on `spawn` and make it the respawn point.
    pub fn place_at_spawn(&mut self, spawn: Vec2, config: &GameConfig) {
        self.aabb = Aabb::new(
            spawn.x,
            spawn.y,
            config.spawn.player_width,
            config.spawn.player_height,
        );
        self.velocity = Vec2::ZERO;
        self.on_ground = false;
        self.big = false;
        self.big_timer = 0.0;
        self.spawn = spawn;
    }

    pub fn hitbox(&self) -> Rect {
        self.aabb.to_rect()
    }

    /// One tick of input-driven movement: jump edge, run acceleration, gravity,
    /// collision against `solids`, then ground friction.
    pub fn step(&mut self, input: &TickInput, physics: &PhysicsConfig, solids: &[Rect]) {
        // Jump reads the ground contact from the previous tick.
        if input.jump && self.on_ground {
            let scale = if self.big { physics.big_jump_scale } else { 1.0 };
            self.velocity.y = physics.jump_velocity * scale;
        }

        self.velocity.x = (self.velocity.x + input.horizontal.axis() * physics.run_accel)
            .clamp(-physics.max_run_speed, physics.max_run_speed);
        self.velocity.y = (self.velocity.y + physics.gravity).min(physics.max_fall_speed);

        let result = move_and_collide(solids, self.aabb, self.velocity);
        self.apply_collision_result(result);

        if self.on_ground && self.velocity.x.abs() > physics.friction_threshold {
            self.velocity.x *= physics.ground_friction;
            if self.velocity.x.abs() < physics.friction_cutoff {
                self.velocity.x = 0.0;
            }
        }
    }

    fn apply_collision_result(&mut self, result: CollisionMoveResult) {
        self.aabb = result.aabb;
        self.velocity = result.velocity;
        self.on_ground = result.on_ground;
    }

    /// Enter big mode: grow upward by `amount` keeping the feet in place.
    pub fn grow(&mut self, amount: f32, duration: f32) {
        self.big = true;
        self.big_timer = duration;
        self.aabb.h += amount;
        self.aabb.y -= amount;
    }

    /// Leave big mode: exact inverse of `grow`.
    pub fn shrink(&mut self, amount: f32) {
        self.big = false;
        self.big_timer = 0.0;
        self.aabb.h -= amount;
        self.aabb.y += amount;
    }

    pub fn respawn(&mut self) {
        self.aabb.x = self.spawn.x;
        self.aabb.y = self.spawn.y;
        self.velocity = Vec2::ZERO;
    }

    /// Spend a life and respawn. Returns true when no lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.respawn();
        self.lives == 0
    }
}
