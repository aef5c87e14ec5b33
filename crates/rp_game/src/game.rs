//! Game state machine and per-tick orchestration.
//!
//! `Game` owns the current `Level`, the `Player` and the level timer, and is
//! the only writer of any of them. One call to `tick` is one frame: it reads a
//! `TickInput`, applies the transition for the current `GameState` and, while
//! playing, runs the updaters in a fixed order:
//!
//!   jump/run/gravity/collision -> coins -> power-ups -> enemy patrol ->
//!   combat -> fall-off -> goal -> big-mode depletion -> level timer
//!
//! Running out of lives or touching the goal ends the tick on the spot, so a
//! game over can never be overwritten by a later goal overlap in the same tick.

use glam::Vec2;

use crate::config::GameConfig;
use crate::entities::{
    collect_pickups, deplete_big_mode, resolve_combat, update_enemies, CombatOutcome,
};
use crate::input::TickInput;
use crate::level::{validate_levels, Level};
use crate::levels::LevelTable;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Title,
    Playing,
    LevelClear,
    GameOver,
    /// Every level cleared. Proceed returns to the title screen.
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLostCause {
    Enemy,
    Fell,
    Timeout,
}

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: usize },
    CoinCollected { coin: usize },
    PowerUpCollected { power_up: usize, grew: bool },
    EnemyStomped { enemy: usize },
    ShrankFromHit { enemy: usize },
    LifeLost { cause: LifeLostCause, lives_left: u32 },
    BigModeExpired,
    GoalReached { level: usize },
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub flow: TickFlow,
    pub events: Vec<GameEvent>,
}

pub struct Game {
    config: GameConfig,
    levels: LevelTable,
    state: GameState,
    level_index: usize,
    level: Level,
    player: Player,
    level_started_ms: u64,
}

impl Game {
    /// Validate the level table and build the first level behind the title
    /// screen. `now_ms` is the caller's monotonic clock.
    pub fn new(config: GameConfig, levels: LevelTable, now_ms: u64) -> Result<Self, String> {
        validate_levels(levels)?;

        let level = Level::build(levels[0], &config);
        let player = Player::new(&config);
        let mut game = Self {
            config,
            levels,
            state: GameState::Title,
            level_index: 0,
            level,
            player,
            level_started_ms: now_ms,
        };
        let mut events = Vec::new();
        game.start_level(0, now_ms, &mut events);
        Ok(game)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Zero-based index into the level table.
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whole seconds left on the level timer; zero or negative once expired.
    pub fn time_left(&self, now_ms: u64) -> i64 {
        let elapsed_secs = now_ms.saturating_sub(self.level_started_ms) / 1000;
        i64::from(self.config.rules.level_seconds) - elapsed_secs as i64
    }

    pub fn tick(&mut self, input: &TickInput, now_ms: u64) -> TickReport {
        if input.quit {
            log::info!("Quit requested in {:?}", self.state);
            return TickReport {
                flow: TickFlow::Quit,
                events: Vec::new(),
            };
        }

        let mut events = Vec::new();
        match self.state {
            GameState::Title | GameState::GameOver => {
                if input.proceed {
                    self.new_game(now_ms, &mut events);
                    self.update_playing(input, now_ms, &mut events);
                }
            }
            GameState::Playing => {
                if input.restart {
                    log::info!("Restarting level {}", self.level_index + 1);
                    self.start_level(self.level_index, now_ms, &mut events);
                }
                self.update_playing(input, now_ms, &mut events);
            }
            GameState::LevelClear => {
                if input.proceed {
                    self.advance_level(now_ms, &mut events);
                    if self.state == GameState::Playing {
                        self.update_playing(input, now_ms, &mut events);
                    }
                }
            }
            GameState::Win => {
                if input.proceed {
                    self.set_state(GameState::Title);
                }
            }
        }

        TickReport {
            flow: TickFlow::Continue,
            events,
        }
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            log::info!("State: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn new_game(&mut self, now_ms: u64, events: &mut Vec<GameEvent>) {
        self.player.reset_progress(self.config.rules.starting_lives);
        self.start_level(0, now_ms, events);
        self.set_state(GameState::Playing);
    }

    fn advance_level(&mut self, now_ms: u64, events: &mut Vec<GameEvent>) {
        let next = self.level_index + 1;
        if next >= self.levels.len() {
            events.push(GameEvent::Won);
            self.set_state(GameState::Win);
        } else {
            self.start_level(next, now_ms, events);
            self.set_state(GameState::Playing);
        }
    }

    /// Rebuild level `index` from its rows, drop a normal-size player onto the
    /// spawn point and restart the level timer. Score, coins and lives carry over.
    fn start_level(&mut self, index: usize, now_ms: u64, events: &mut Vec<GameEvent>) {
        self.level_index = index;
        self.level = Level::build(self.levels[index], &self.config);

        let spawn_config = &self.config.spawn;
        let start = Vec2::new(spawn_config.x, spawn_config.y);
        let size = Vec2::new(spawn_config.player_width, spawn_config.player_height);
        let spawn = self
            .level
            .find_spawn(start, size, spawn_config.max_drop_iterations)
            .unwrap_or_else(|| {
                log::warn!(
                    "Level {} has no floor below the spawn point; spawning at ({}, {})",
                    index + 1,
                    start.x,
                    start.y
                );
                start
            });
        self.player.place_at_spawn(spawn, &self.config);
        self.level_started_ms = now_ms;

        log::info!(
            "Level {} started, spawn ({:.1}, {:.1})",
            index + 1,
            spawn.x,
            spawn.y
        );
        events.push(GameEvent::LevelStarted { level: index });
    }

    fn update_playing(&mut self, input: &TickInput, now_ms: u64, events: &mut Vec<GameEvent>) {
        self.player
            .step(input, &self.config.physics, &self.level.solids);

        collect_pickups(&mut self.player, &mut self.level, &self.config, events);

        update_enemies(
            &mut self.level.enemies,
            &self.level.solids,
            &self.config.enemy.ledge_sensor,
        );
        if resolve_combat(
            &mut self.player,
            &mut self.level.enemies,
            &self.config,
            events,
        ) == CombatOutcome::LivesExhausted
        {
            self.game_over(events);
            return;
        }

        let fall_limit = self.config.viewport.height as f32 + self.config.rules.fall_margin;
        if self.player.aabb.y > fall_limit && self.lose_life(LifeLostCause::Fell, events) {
            return;
        }

        if let Some(goal) = self.level.goal {
            if self.player.hitbox().overlaps(&goal) {
                events.push(GameEvent::GoalReached {
                    level: self.level_index,
                });
                self.set_state(GameState::LevelClear);
                return;
            }
        }

        deplete_big_mode(
            &mut self.player,
            self.config.viewport.tick_seconds(),
            self.config.viewport.half_tile(),
            events,
        );

        if self.time_left(now_ms) <= 0 {
            // Only the player restarts; the level keeps its state.
            self.level_started_ms = now_ms;
            self.lose_life(LifeLostCause::Timeout, events);
        }
    }

    /// Spend a life and respawn. Returns true when that was the last one and
    /// the game is over.
    fn lose_life(&mut self, cause: LifeLostCause, events: &mut Vec<GameEvent>) -> bool {
        let exhausted = self.player.lose_life();
        events.push(GameEvent::LifeLost {
            cause,
            lives_left: self.player.lives,
        });
        log::debug!("Life lost ({cause:?}), {} left", self.player.lives);
        if exhausted {
            self.game_over(events);
        }
        exhausted
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver);
        self.set_state(GameState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Horizontal;
    use crate::levels::LEVELS;

    const TILE: f32 = 48.0;

    // Spawn lands at (60, 56) on the row-2 floor.
    const FLAT: &[&str] = &["          ", "          ", "XXXXXXXXXX"];
    // Goal cell is a hole in the floor; its zone spans y 48..240.
    const WITH_GOAL: &[&str] = &["", "", "", "", "", "XXXFXXXXXX"];
    const TWO_LEVELS: LevelTable = &[FLAT, FLAT];

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn proceed() -> TickInput {
        TickInput {
            proceed: true,
            ..TickInput::default()
        }
    }

    fn playing(levels: LevelTable) -> Game {
        let mut game = Game::new(GameConfig::default(), levels, 0).expect("levels are valid");
        game.tick(&proceed(), 0);
        assert_eq!(game.state(), GameState::Playing);
        game
    }

    #[test]
    fn starts_on_title_with_first_level_built() {
        let game = Game::new(GameConfig::default(), LEVELS, 0).expect("built-in levels");
        assert_eq!(game.state(), GameState::Title);
        assert_eq!(game.level_index(), 0);
        assert!(!game.level().solids.is_empty());
        assert_eq!(game.player().lives, 3);
    }

    #[test]
    fn rejects_level_tables_with_duplicate_goals() {
        const BAD: LevelTable = &[&["F  F", "XXXX"]];
        let err = Game::new(GameConfig::default(), BAD, 0)
            .err()
            .expect("duplicate goals should fail");
        assert!(err.contains("Level 1"));
        assert!(err.contains("duplicate goal marker"));
    }

    #[test]
    fn title_ignores_everything_but_proceed() {
        let mut game = Game::new(GameConfig::default(), TWO_LEVELS, 0).expect("valid");
        let report = game.tick(
            &TickInput {
                horizontal: Horizontal::Right,
                jump: true,
                restart: true,
                ..TickInput::default()
            },
            0,
        );
        assert_eq!(game.state(), GameState::Title);
        assert!(report.events.is_empty());
        assert_eq!(game.player().aabb.x, 60.0);
    }

    #[test]
    fn proceed_into_play_runs_the_first_update_on_the_same_tick() {
        let mut game = Game::new(GameConfig::default(), TWO_LEVELS, 0).expect("valid");
        let run_right = TickInput {
            horizontal: Horizontal::Right,
            proceed: true,
            ..TickInput::default()
        };

        game.tick(&run_right, 0);
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.player().aabb.x > 60.0);
        assert!(game.player().on_ground);

        game.set_state(GameState::LevelClear);
        let report = game.tick(&run_right, 100);
        assert_eq!(game.level_index(), 1);
        assert_eq!(report.events, vec![GameEvent::LevelStarted { level: 1 }]);
        assert!(game.player().aabb.x > 60.0);
    }

    #[test]
    fn quit_returns_before_any_side_effect() {
        let mut game = playing(TWO_LEVELS);
        let before = game.player().aabb;
        let report = game.tick(
            &TickInput {
                horizontal: Horizontal::Right,
                quit: true,
                ..TickInput::default()
            },
            16,
        );
        assert_eq!(report.flow, TickFlow::Quit);
        assert!(report.events.is_empty());
        assert_eq!(game.player().aabb, before);
    }

    #[test]
    fn goal_overlap_clears_the_level_on_the_same_tick() {
        const GOAL_LEVELS: LevelTable = &[WITH_GOAL];
        let mut game = playing(GOAL_LEVELS);
        // Goal zone is x 162..174; put the player just beside it.
        game.player.aabb.x = 130.0;
        game.player.velocity.x = 5.0;

        let report = game.tick(&idle(), 16);
        assert_eq!(game.state(), GameState::LevelClear);
        assert!(report
            .events
            .contains(&GameEvent::GoalReached { level: 0 }));

        // Nothing moves while the level-clear screen is up.
        let frozen = game.player().aabb;
        game.tick(
            &TickInput {
                horizontal: Horizontal::Right,
                ..TickInput::default()
            },
            32,
        );
        assert_eq!(game.player().aabb, frozen);
    }

    #[test]
    fn level_clear_advances_then_wins_after_last_level() {
        let mut game = playing(TWO_LEVELS);
        game.player.score = 900;
        game.player.coins = 4;

        game.set_state(GameState::LevelClear);
        let report = game.tick(&proceed(), 100);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.level_index(), 1);
        assert_eq!(report.events, vec![GameEvent::LevelStarted { level: 1 }]);
        assert_eq!(game.player().score, 900);
        assert_eq!(game.player().coins, 4);

        game.set_state(GameState::LevelClear);
        let report = game.tick(&proceed(), 200);
        assert_eq!(game.state(), GameState::Win);
        assert_eq!(report.events, vec![GameEvent::Won]);

        game.tick(&idle(), 300);
        assert_eq!(game.state(), GameState::Win);
        game.tick(&proceed(), 400);
        assert_eq!(game.state(), GameState::Title);
    }

    #[test]
    fn enemy_hit_at_normal_size_costs_exactly_one_life() {
        const ENEMY_LEVEL: LevelTable = &[&["          ", "  E       ", "XXXXXXXXXX"]];
        let mut game = playing(ENEMY_LEVEL);
        let spawn = game.player().spawn;
        // Enemy sits at x 102..138, y 56..88; walk the player into its side.
        game.player.aabb.x = 70.0;
        game.player.velocity.x = 6.0;

        let report = game.tick(&idle(), 16);
        assert_eq!(game.player().lives, 2);
        assert_eq!(game.player().aabb.x, spawn.x);
        assert_eq!(game.player().aabb.y, spawn.y);
        assert_eq!(game.player().velocity, Vec2::ZERO);
        assert_eq!(game.state(), GameState::Playing);
        assert!(report.events.contains(&GameEvent::LifeLost {
            cause: LifeLostCause::Enemy,
            lives_left: 2
        }));
    }

    #[test]
    fn running_out_of_lives_is_game_over_even_on_the_goal() {
        // The goal zone reaches up over the spawn point, so a respawn lands on it.
        const TRAP: LevelTable = &[&["", "", "XXXXXXXXXX", "", "", " F"]];
        let mut game = Game::new(GameConfig::default(), TRAP, 0).expect("valid");
        game.set_state(GameState::Playing);
        game.player.lives = 1;
        game.player.aabb.y = 2000.0;

        let report = game.tick(&idle(), 16);
        assert_eq!(game.player().lives, 0);
        assert_eq!(game.state(), GameState::GameOver);
        assert!(report.events.contains(&GameEvent::GameOver));
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::GoalReached { .. })));
    }

    #[test]
    fn falling_off_the_world_costs_a_life() {
        let mut game = playing(TWO_LEVELS);
        game.player.aabb.y = 540.0 + 200.0 + 1.0;

        let report = game.tick(&idle(), 16);
        assert_eq!(game.player().lives, 2);
        assert_eq!(game.player().aabb.y, game.player().spawn.y);
        assert!(report.events.contains(&GameEvent::LifeLost {
            cause: LifeLostCause::Fell,
            lives_left: 2
        }));
    }

    #[test]
    fn timeout_with_one_life_left_is_game_over() {
        let mut game = playing(TWO_LEVELS);
        game.player.lives = 1;
        game.player.aabb.x = 300.0;

        let report = game.tick(&idle(), 300_000);
        assert_eq!(game.player().lives, 0);
        assert_eq!(game.player().aabb.x, game.player().spawn.x);
        assert_eq!(game.state(), GameState::GameOver);
        assert!(report.events.contains(&GameEvent::LifeLost {
            cause: LifeLostCause::Timeout,
            lives_left: 0
        }));
    }

    #[test]
    fn timeout_resets_the_timer_but_not_the_level() {
        const COIN_LEVEL: LevelTable = &[&["          ", "     C    ", "XXXXXXXXXX"]];
        let mut game = playing(COIN_LEVEL);
        game.level.coins[0].active = false;

        assert_eq!(game.time_left(299_999), 1);
        game.tick(&idle(), 299_999);
        assert_eq!(game.player().lives, 3);

        game.tick(&idle(), 300_000);
        assert_eq!(game.player().lives, 2);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.time_left(300_000), 300);
        assert!(!game.level().coins[0].active);
    }

    #[test]
    fn lives_only_go_down_until_a_new_game() {
        let mut game = playing(TWO_LEVELS);
        let mut previous = game.player().lives;
        for step in 0..3u64 {
            game.player.aabb.y = 10_000.0;
            game.tick(&idle(), 16 * (step + 1));
            assert!(game.player().lives < previous);
            previous = game.player().lives;
        }
        assert_eq!(previous, 0);
        assert_eq!(game.state(), GameState::GameOver);

        // Game over screen keeps the count until proceed starts over.
        game.tick(&idle(), 100);
        assert_eq!(game.player().lives, 0);
        game.tick(&proceed(), 200);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.level_index(), 0);
        assert_eq!(game.player().lives, 3);
        assert_eq!(game.player().score, 0);
        assert_eq!(game.player().coins, 0);
    }

    #[test]
    fn restart_rebuilds_level_and_keeps_progress() {
        const COIN_LEVEL: LevelTable = &[&["          ", "  C       ", "XXXXXXXXXX"]];
        let mut game = playing(COIN_LEVEL);
        game.player.aabb.x = 96.0;

        game.tick(&idle(), 16);
        assert_eq!(game.player().coins, 1);
        assert!(!game.level().coins[0].active);
        game.player.lives = 2;

        let report = game.tick(
            &TickInput {
                restart: true,
                ..TickInput::default()
            },
            5_000,
        );
        assert!(report
            .events
            .contains(&GameEvent::LevelStarted { level: 0 }));
        assert!(game.level().coins[0].active);
        assert_eq!(game.player().coins, 1);
        assert_eq!(game.player().score, 100);
        assert_eq!(game.player().lives, 2);
        assert_eq!(game.time_left(5_000), 300);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn stomped_enemy_never_comes_back_within_the_level() {
        const ENEMY_LEVEL: LevelTable = &[&["          ", "  E       ", "XXXXXXXXXX"]];
        let mut game = playing(ENEMY_LEVEL);
        game.level.enemies[0].active = false;
        for tick in 1..=120u64 {
            game.tick(&idle(), tick * 16);
            assert!(!game.level().enemies[0].active);
        }
    }

    #[test]
    fn new_level_resets_big_mode_to_normal_size() {
        let mut game = playing(TWO_LEVELS);
        game.player.grow(TILE / 2.0, 12.0);
        game.set_state(GameState::LevelClear);

        game.tick(&proceed(), 100);
        assert!(!game.player().big);
        assert_eq!(game.player().aabb.h, 40.0);
        assert_eq!(game.player().aabb.y, 56.0);
    }

    #[test]
    fn big_mode_expires_after_its_duration() {
        let mut game = playing(TWO_LEVELS);
        game.player.grow(TILE / 2.0, 12.0);

        for tick in 0..719u64 {
            game.tick(&idle(), tick * 16);
        }
        assert!(game.player().big);

        let mut expired = false;
        for tick in 719..730u64 {
            let report = game.tick(&idle(), tick * 16);
            expired |= report.events.contains(&GameEvent::BigModeExpired);
        }
        assert!(expired);
        assert!(!game.player().big);
        assert_eq!(game.player().aabb.h, 40.0);
        assert_eq!(game.player().aabb.y, 56.0);
    }
}
