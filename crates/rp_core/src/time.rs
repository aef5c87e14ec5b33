//! Fixed-rate frame pacing: one logical tick per frame.
//!
//! `Realtime` pacing sleeps inside `begin_frame()` until the target interval has
//! elapsed since the previous frame started. `Simulated` pacing never sleeps and
//! advances its clock by exactly one interval per frame, so scripted runs see
//! the same timestamps on every machine.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingMode {
    Realtime,
    Simulated,
}

pub struct FrameClock {
    pub mode: PacingMode,
    pub target_fps: u32,
    pub fixed_dt: f64,
    /// Frames longer than this are reported as hitches.
    pub hitch_threshold: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    started: Instant,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(target_fps: u32, mode: PacingMode) -> Self {
        let target_fps = target_fps.max(1);
        let fixed_dt = 1.0 / f64::from(target_fps);
        let now = Instant::now();
        Self {
            mode,
            target_fps,
            fixed_dt,
            hitch_threshold: 0.25,
            frame_count: 0,
            real_dt: 0.0,
            started: now,
            last_instant: now,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn realtime(target_fps: u32) -> Self {
        Self::new(target_fps, PacingMode::Realtime)
    }

    pub fn simulated(target_fps: u32) -> Self {
        Self::new(target_fps, PacingMode::Simulated)
    }

    /// Wait for the next frame slot and return the measured frame delta in seconds.
    pub fn begin_frame(&mut self) -> f64 {
        match self.mode {
            PacingMode::Realtime => {
                let target = Duration::from_secs_f64(self.fixed_dt);
                let since_last = self.last_instant.elapsed();
                if since_last < target {
                    std::thread::sleep(target - since_last);
                }
                let now = Instant::now();
                self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
                self.last_instant = now;

                if self.real_dt > self.hitch_threshold {
                    log::warn!(
                        "Frame took {:.1}ms (target {:.1}ms)",
                        self.real_dt * 1000.0,
                        self.fixed_dt * 1000.0
                    );
                }
            }
            PacingMode::Simulated => {
                self.real_dt = self.fixed_dt;
            }
        }

        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.real_dt
    }

    /// Monotonic milliseconds since the clock was created.
    pub fn elapsed_ms(&self) -> u64 {
        match self.mode {
            PacingMode::Realtime => self.started.elapsed().as_millis() as u64,
            PacingMode::Simulated => self.frame_count * 1000 / u64::from(self.target_fps),
        }
    }
}
