use rp_core::input::{InputState, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizontal {
    Left,
    Right,
    #[default]
    None,
}

impl Horizontal {
    pub fn axis(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            Self::None => 0.0,
        }
    }

    pub fn from_axis(axis: i32) -> Self {
        match axis.signum() {
            -1 => Self::Left,
            1 => Self::Right,
            _ => Self::None,
        }
    }
}

/// Discrete input consumed by one tick. Everything except `horizontal` is an
/// edge: true only on the tick the key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub horizontal: Horizontal,
    pub jump: bool,
    pub restart: bool,
    pub proceed: bool,
    pub quit: bool,
}

impl TickInput {
    /// Keyboard map: Left/A and Right/D run (both held cancel out), Z/Space/Up
    /// jump, R restarts the level, Enter proceeds, Escape quits.
    pub fn from_input_state(input: &InputState) -> Self {
        let mut axis = 0;
        if input.is_held(Key::Left) || input.is_held(Key::A) {
            axis -= 1;
        }
        if input.is_held(Key::Right) || input.is_held(Key::D) {
            axis += 1;
        }

        Self {
            horizontal: Horizontal::from_axis(axis),
            jump: input.is_just_pressed(Key::Z)
                || input.is_just_pressed(Key::Space)
                || input.is_just_pressed(Key::Up),
            restart: input.is_just_pressed(Key::R),
            proceed: input.is_just_pressed(Key::Enter),
            quit: input.is_just_pressed(Key::Escape),
        }
    }
}
