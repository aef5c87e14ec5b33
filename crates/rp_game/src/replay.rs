use rp_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::input::TickInput;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

/// Keys held for `repeat` consecutive ticks. Jump, restart, proceed and quit
/// fire once when they go down; keep them set across frames to hold them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: i32,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub restart: bool,
    #[serde(default)]
    pub proceed: bool,
    #[serde(default)]
    pub quit: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    fn held_keys(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        match self.move_x.signum() {
            -1 => keys.push(Key::Left),
            1 => keys.push(Key::Right),
            _ => {}
        }
        if self.jump {
            keys.push(Key::Z);
        }
        if self.restart {
            keys.push(Key::R);
        }
        if self.proceed {
            keys.push(Key::Enter);
        }
        if self.quit {
            keys.push(Key::Escape);
        }
        keys
    }
}

impl ReplaySequence {
    /// One `TickInput` per tick, produced through the same keyboard state the
    /// interactive path uses.
    pub fn expanded_inputs(&self) -> Vec<TickInput> {
        let mut keyboard = InputState::new();
        let mut out = Vec::new();
        for frame in &self.frames {
            let keys = frame.held_keys();
            for _ in 0..frame.repeat.max(1) {
                keyboard.sync_held(&keys);
                out.push(TickInput::from_input_state(&keyboard));
                keyboard.end_frame();
            }
        }
        out
    }

    pub fn total_ticks(&self) -> u64 {
        self.frames
            .iter()
            .map(|frame| u64::from(frame.repeat.max(1)))
            .sum()
    }
}

/// Built-in attract-mode run: leave the title screen, then run right and hop
/// at a steady rhythm.
pub fn demo_sequence() -> ReplaySequence {
    let mut frames = vec![
        ReplayFrame {
            proceed: true,
            ..ReplayFrame::default()
        },
        ReplayFrame {
            repeat: 30,
            ..ReplayFrame::default()
        },
    ];
    for _ in 0..40 {
        frames.push(ReplayFrame {
            move_x: 1,
            repeat: 45,
            ..ReplayFrame::default()
        });
        frames.push(ReplayFrame {
            move_x: 1,
            jump: true,
            repeat: 12,
            ..ReplayFrame::default()
        });
    }
    ReplaySequence { frames }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    if let Some(index) = replay.frames.iter().position(|f| !(-1..=1).contains(&f.move_x)) {
        return Err(format!(
            "Replay validation failed: frame {index} move_x must be -1, 0 or 1"
        ));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Game, GameState, TickFlow};
    use crate::input::Horizontal;
    use crate::levels::LEVELS;
    use crate::snapshot::FrameSnapshot;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rp_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "proceed": true },
                { "move_x": 1, "repeat": 3 },
                { "move_x": -1, "jump": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert_eq!(replay.total_ticks(), 5);
        assert!(expanded[0].proceed);
        assert!(!expanded[1].proceed);
        assert_eq!(expanded[1].horizontal, Horizontal::Right);
        assert_eq!(expanded[4].horizontal, Horizontal::Left);
        assert!(expanded[4].jump);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn held_jump_fires_once() {
        let replay = ReplaySequence {
            frames: vec![
                ReplayFrame {
                    jump: true,
                    repeat: 3,
                    ..ReplayFrame::default()
                },
                ReplayFrame::default(),
                ReplayFrame {
                    jump: true,
                    ..ReplayFrame::default()
                },
            ],
        };
        let jumps: Vec<bool> = replay.expanded_inputs().iter().map(|i| i.jump).collect();
        assert_eq!(jumps, vec![true, false, false, false, true]);
    }

    #[test]
    fn zero_repeat_still_plays_once() {
        let replay = ReplaySequence {
            frames: vec![ReplayFrame {
                quit: true,
                repeat: 0,
                ..ReplayFrame::default()
            }],
        };
        let inputs = replay.expanded_inputs();
        assert_eq!(inputs.len(), 1);
        assert!(inputs[0].quit);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn out_of_range_move_is_rejected() {
        let path = temp_file_path("range");
        fs::write(&path, r#"{ "frames": [ {}, { "move_x": 2 } ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("move_x 2 should fail");
        assert!(err.contains("frame 1"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let path = temp_file_path("missing");
        let err = load_replay_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn shipped_replay_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/replays/level1.json");
        let replay = load_replay_from_path(&path).expect("shipped replay should load");
        let inputs = replay.expanded_inputs();
        assert!(inputs[0].proceed);
        assert!(inputs.last().is_some_and(|input| input.quit));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let inputs = demo_sequence().expanded_inputs();

        let run = || {
            let mut game = Game::new(GameConfig::default(), LEVELS, 0).expect("built-in levels");
            let mut events = Vec::new();
            let mut last = None;
            for (tick, input) in inputs.iter().enumerate() {
                let now_ms = tick as u64 * 1000 / 60;
                let report = game.tick(input, now_ms);
                events.extend(report.events);
                last = Some(FrameSnapshot::capture(&game, now_ms));
                if report.flow == TickFlow::Quit {
                    break;
                }
            }
            (events, last)
        };

        let (events_a, last_a) = run();
        let (events_b, last_b) = run();
        assert_eq!(events_a, events_b);
        assert_eq!(last_a, last_b);
    }

    #[test]
    fn demo_leaves_the_title_screen() {
        let inputs = demo_sequence().expanded_inputs();
        let mut game = Game::new(GameConfig::default(), LEVELS, 0).expect("built-in levels");
        game.tick(&inputs[0], 0);
        assert_eq!(game.state(), GameState::Playing);
        assert!(inputs.iter().skip(1).any(|input| input.jump));
    }
}
